//! Exhaustive QUBO search.
//!
//! Walks all `2^n` assignments in Gray-code order so each step flips a
//! single bit and costs `O(degree)`. Exact, deterministic, and only
//! practical for small problems.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Assignment, Couplings, Qubo, Sample};
use crate::error::{OptimizerError, Result};
use crate::port::{QuboOptimizer, SolverConfig};

/// Default variable limit; `2^24` steps finish in well under a second.
pub const DEFAULT_MAX_VARIABLES: usize = 24;

/// Energies closer than this are treated as equal, so the first optimum found wins.
const TIE_TOLERANCE: f64 = 1e-9;

/// Brute-force optimizer for small QUBOs.
#[derive(Debug, Clone)]
pub struct ExhaustiveOptimizer {
    max_variables: usize,
}

impl ExhaustiveOptimizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }

    /// Override the variable limit. Values above 63 are clamped.
    #[must_use]
    pub fn with_max_variables(max_variables: usize) -> Self {
        Self {
            max_variables: max_variables.min(63),
        }
    }

    #[must_use]
    pub fn max_variables(&self) -> usize {
        self.max_variables
    }

    fn search(&self, qubo: &Qubo) -> Result<Sample> {
        let n = qubo.num_vars();
        if n > self.max_variables {
            return Err(OptimizerError::CapacityExceeded {
                backend: self.name(),
                dimension: "variables",
                actual: n,
                limit: Some(self.max_variables),
            }
            .into());
        }
        if n == 0 {
            return Ok(Sample::empty());
        }

        let couplings = Couplings::new(qubo);
        let mut bits = vec![0u8; n];
        let mut energy = 0.0;
        let mut best_energy = energy;
        let mut best_bits = bits.clone();

        for step in 1..(1u64 << n) {
            let i = step.trailing_zeros() as usize;
            energy += couplings.flip_delta(&bits, i);
            bits[i] ^= 1;
            if energy < best_energy - TIE_TOLERANCE {
                best_energy = energy;
                best_bits.copy_from_slice(&bits);
            }
        }

        let assignment = Assignment::try_new(best_bits)?;
        let energy = qubo.evaluate(&assignment)?;
        debug!(variables = n, energy, "exhaustive search complete");
        Ok(Sample { assignment, energy })
    }
}

impl Default for ExhaustiveOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuboOptimizer for ExhaustiveOptimizer {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    async fn solve(&self, qubo: &Qubo, _config: &SolverConfig) -> Result<Sample> {
        self.search(qubo)
    }
}
