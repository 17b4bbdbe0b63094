//! Exact QUBO solving with HiGHS via good_lp.
//!
//! The QUBO is linearized into a mixed-integer program: every variable
//! becomes a binary `x_i` and every interaction `(i, j)` gets a product
//! variable `y_ij` bounded by the McCormick constraints
//!
//! ```text
//! y_ij <= x_i,  y_ij <= x_j,  y_ij >= x_i + x_j - 1,  0 <= y_ij <= 1
//! ```
//!
//! which force `y_ij == x_i * x_j` whenever the `x` are integral.

use async_trait::async_trait;
use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel, Variable};
use tracing::debug;

use crate::domain::{Assignment, Qubo, Sample};
use crate::error::{OptimizerError, Result};
use crate::port::{QuboOptimizer, SolverConfig};

/// Default variable limit for the linearized program.
pub const DEFAULT_MAX_VARIABLES: usize = 2_000;

/// HiGHS-based exact QUBO optimizer.
#[derive(Debug, Clone)]
pub struct HighsOptimizer {
    max_variables: usize,
}

impl HighsOptimizer {
    /// Create a new HiGHS optimizer instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }

    #[must_use]
    pub fn with_max_variables(max_variables: usize) -> Self {
        Self { max_variables }
    }
}

impl Default for HighsOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuboOptimizer for HighsOptimizer {
    fn name(&self) -> &'static str {
        "highs"
    }

    async fn solve(&self, qubo: &Qubo, _config: &SolverConfig) -> Result<Sample> {
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
        solve_linearized(qubo)
    }
}

/// Internal solver implementation using good_lp.
fn solve_linearized(qubo: &Qubo) -> Result<Sample> {
    let n = qubo.num_vars();

    // Handle empty problem
    if n == 0 {
        return Ok(Sample::empty());
    }

    let mut vars = variables!();
    let x: Vec<Variable> = (0..n).map(|_| vars.add(variable().binary())).collect();

    let interactions: Vec<(usize, usize, f64)> = qubo
        .quadratic_terms()
        .filter(|(_, _, c)| *c != 0.0)
        .collect();
    let y: Vec<Variable> = interactions
        .iter()
        .map(|_| vars.add(variable().min(0.0).max(1.0)))
        .collect();

    let linear: Expression = qubo.linear_terms().map(|(i, c)| c * x[i]).sum();
    let quadratic: Expression = interactions
        .iter()
        .zip(&y)
        .map(|((_, _, c), y_ij)| *c * *y_ij)
        .sum();

    let mut model = vars.minimise(linear + quadratic).using(highs);
    for ((i, j, _), &y_ij) in interactions.iter().zip(&y) {
        let (x_i, x_j) = (x[*i], x[*j]);
        model = model
            .with(constraint!(y_ij <= x_i))
            .with(constraint!(y_ij <= x_j))
            .with(constraint!(y_ij - x_i - x_j >= -1.0));
    }

    let solution = model.solve().map_err(|e| OptimizerError::Backend {
        backend: "highs",
        reason: e.to_string(),
    })?;

    let assignment: Assignment = x.iter().map(|v| solution.value(*v) > 0.5).collect();
    let energy = qubo.evaluate(&assignment)?;
    debug!(
        variables = n,
        interactions = interactions.len(),
        energy,
        "highs solve complete"
    );
    Ok(Sample { assignment, energy })
}
