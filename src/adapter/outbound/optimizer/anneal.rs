//! Classical simulated annealing over QUBO bits.
//!
//! Each read starts from a random assignment and performs `sweeps` passes
//! over all variables while the temperature decays geometrically from
//! `initial_temperature` to `final_temperature`. Flip deltas come from
//! [`Couplings`] in `O(degree)`. The best assignment over all reads wins.

use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Assignment, Couplings, Qubo, Sample};
use crate::error::{OptimizerError, Result};
use crate::port::{QuboOptimizer, SolverConfig};

/// Energies closer than this are treated as equal.
const TIE_TOLERANCE: f64 = 1e-9;

/// Annealing schedule and sampling parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnnealConfig {
    /// Passes over all variables per read.
    ///
    /// Defaults to 1000.
    #[serde(default = "default_sweeps")]
    pub sweeps: usize,

    /// Independent restarts; the best result is kept.
    ///
    /// Defaults to 16.
    #[serde(default = "default_reads", alias = "restarts")]
    pub reads: usize,

    /// Starting temperature. Derived from the largest possible flip delta
    /// when unset.
    #[serde(default)]
    pub initial_temperature: Option<f64>,

    /// Final temperature. Defaults to a thousandth of the initial one.
    #[serde(default)]
    pub final_temperature: Option<f64>,

    /// RNG seed for reproducible runs. Seeded from entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Largest problem accepted.
    ///
    /// Defaults to 100000 variables.
    #[serde(default = "default_max_variables")]
    pub max_variables: usize,
}

fn default_sweeps() -> usize {
    1000
}

fn default_reads() -> usize {
    16
}

fn default_max_variables() -> usize {
    100_000
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            sweeps: default_sweeps(),
            reads: default_reads(),
            initial_temperature: None,
            final_temperature: None,
            seed: None,
            max_variables: default_max_variables(),
        }
    }
}

/// Simulated annealing optimizer.
#[derive(Debug, Clone)]
pub struct AnnealingOptimizer {
    config: AnnealConfig,
}

impl AnnealingOptimizer {
    #[must_use]
    pub const fn new(config: AnnealConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &AnnealConfig {
        &self.config
    }

    fn schedule(&self, couplings: &Couplings) -> (f64, f64) {
        // Temperatures stay in [MIN_POSITIVE, initial]; zero, subnormal or
        // NaN inputs degrade to a greedy descent.
        let initial = self
            .config
            .initial_temperature
            .unwrap_or_else(|| couplings.max_flip_magnitude().max(1.0))
            .max(f64::MIN_POSITIVE);
        let last = self
            .config
            .final_temperature
            .unwrap_or(initial * 1e-3)
            .max(f64::MIN_POSITIVE)
            .min(initial);
        let steps = self.config.sweeps.saturating_sub(1).max(1);
        let ratio = (last / initial).powf(1.0 / steps as f64);
        (initial, ratio)
    }

    fn search(&self, qubo: &Qubo, solver_config: &SolverConfig) -> Result<Sample> {
        let n = qubo.num_vars();
        if n > self.config.max_variables {
            return Err(OptimizerError::CapacityExceeded {
                backend: self.name(),
                dimension: "variables",
                actual: n,
                limit: Some(self.config.max_variables),
            }
            .into());
        }
        if n == 0 {
            return Ok(Sample::empty());
        }

        let couplings = Couplings::new(qubo);
        let (initial, ratio) = self.schedule(&couplings);
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let started = Instant::now();
        let mut best: Option<(f64, Vec<u8>)> = None;
        let reads = self.config.reads.max(1);

        for read in 0..reads {
            let mut bits: Vec<u8> = (0..n).map(|_| u8::from(rng.gen::<bool>())).collect();
            let mut energy = qubo.evaluate_bits(&bits);
            let mut read_best = (energy, bits.clone());
            let mut temperature = initial;

            for _ in 0..self.config.sweeps {
                for i in 0..n {
                    let delta = couplings.flip_delta(&bits, i);
                    if delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
                        bits[i] ^= 1;
                        energy += delta;
                        if energy < read_best.0 - TIE_TOLERANCE {
                            read_best = (energy, bits.clone());
                        }
                    }
                }
                temperature *= ratio;
            }

            debug!(read, energy = read_best.0, "annealing read complete");
            if best
                .as_ref()
                .map_or(true, |(e, _)| read_best.0 < *e - TIE_TOLERANCE)
            {
                best = Some(read_best);
            }

            if started.elapsed() > solver_config.timeout() && read + 1 < reads {
                warn!(
                    completed = read + 1,
                    requested = reads,
                    "annealing time budget exhausted, keeping best read so far"
                );
                break;
            }
        }

        let (_, bits) = best.unwrap_or_else(|| (0.0, vec![0; n]));
        let assignment = Assignment::try_new(bits)?;
        let energy = qubo.evaluate(&assignment)?;
        Ok(Sample { assignment, energy })
    }
}

impl Default for AnnealingOptimizer {
    fn default() -> Self {
        Self::new(AnnealConfig::default())
    }
}

#[async_trait]
impl QuboOptimizer for AnnealingOptimizer {
    fn name(&self) -> &'static str {
        "anneal"
    }

    async fn solve(&self, qubo: &Qubo, config: &SolverConfig) -> Result<Sample> {
        self.search(qubo, config)
    }
}
