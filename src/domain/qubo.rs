//! QUBO representation and the max-cut formulation of a trade graph.
//!
//! Coefficients live in a sparse map. Off-diagonal terms are stored once
//! under the canonical key `(i, j)` with `i < j`; diagonal keys `(i, i)` hold
//! linear coefficients. The objective is therefore
//!
//! ```text
//! E(x) = sum_i Q[i,i] x_i + sum_{i<j} Q[i,j] x_i x_j
//! ```
//!
//! For an edge `(i, j, w)` the formulation adds `-w` to both diagonals and
//! `+2w` to `Q[i,j]`, so the edge contributes `-w` exactly when
//! `x_i != x_j`. Minimizing `E` maximizes the total cut weight. Nothing
//! penalizes an item being cut by several edges at once.

use std::collections::BTreeMap;

use super::assignment::Assignment;
use super::error::DomainError;
use super::graph::TradeGraph;

/// Sparse upper-triangular QUBO over `num_vars` binary variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qubo {
    num_vars: usize,
    terms: BTreeMap<(usize, usize), f64>,
}

impl Qubo {
    /// Create a QUBO over `num_vars` variables with every linear term at zero.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            terms: (0..num_vars).map(|i| ((i, i), 0.0)).collect(),
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_vars == 0
    }

    /// Add `coefficient` to the linear term of variable `i`.
    pub fn add_linear(&mut self, i: usize, coefficient: f64) {
        debug_assert!(i < self.num_vars, "variable {i} out of range");
        *self.terms.entry((i, i)).or_insert(0.0) += coefficient;
    }

    /// Add `coefficient` to the interaction between `i` and `j`.
    ///
    /// The pair is canonicalized; `i == j` folds into the linear term since
    /// `x_i * x_i == x_i` for binary variables.
    pub fn add_quadratic(&mut self, i: usize, j: usize, coefficient: f64) {
        debug_assert!(i < self.num_vars && j < self.num_vars);
        *self.terms.entry((i.min(j), i.max(j))).or_insert(0.0) += coefficient;
    }

    #[must_use]
    pub fn linear(&self, i: usize) -> f64 {
        self.terms.get(&(i, i)).copied().unwrap_or(0.0)
    }

    /// Interaction coefficient between `i` and `j` in either order.
    #[must_use]
    pub fn quadratic(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.terms
            .get(&(i.min(j), i.max(j)))
            .copied()
            .unwrap_or(0.0)
    }

    /// All stored terms as `(i, j, coefficient)` with `i <= j`.
    pub fn terms(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.terms.iter().map(|(&(i, j), &c)| (i, j, c))
    }

    /// Linear terms as `(i, coefficient)`.
    pub fn linear_terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.terms().filter(|(i, j, _)| i == j).map(|(i, _, c)| (i, c))
    }

    /// Off-diagonal terms as `(i, j, coefficient)` with `i < j`.
    pub fn quadratic_terms(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.terms().filter(|(i, j, _)| i != j)
    }

    /// Number of stored off-diagonal terms.
    #[must_use]
    pub fn num_interactions(&self) -> usize {
        self.quadratic_terms().count()
    }

    /// Sum of absolute off-diagonal coefficients.
    #[must_use]
    pub fn off_diagonal_magnitude(&self) -> f64 {
        self.quadratic_terms().map(|(_, _, c)| c.abs()).sum()
    }

    /// Evaluate the objective at `assignment`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DimensionMismatch`] if the assignment length
    /// differs from [`num_vars`](Self::num_vars).
    pub fn evaluate(&self, assignment: &Assignment) -> Result<f64, DomainError> {
        if assignment.len() != self.num_vars {
            return Err(DomainError::DimensionMismatch {
                expected: self.num_vars,
                actual: assignment.len(),
            });
        }
        Ok(self.evaluate_bits(assignment.bits()))
    }

    /// Evaluate the objective on raw bits whose length is already checked.
    pub(crate) fn evaluate_bits(&self, bits: &[u8]) -> f64 {
        self.terms
            .iter()
            .filter(|&(&(i, j), _)| bits[i] == 1 && bits[j] == 1)
            .map(|(_, &c)| c)
            .sum()
    }
}

/// Adjacency view of a QUBO for local-search solvers.
///
/// Lets a solver compute the energy change of a single bit flip in
/// `O(degree)` instead of re-evaluating the whole objective.
#[derive(Debug, Clone)]
pub struct Couplings {
    linear: Vec<f64>,
    neighbors: Vec<Vec<(usize, f64)>>,
}

impl Couplings {
    #[must_use]
    pub fn new(qubo: &Qubo) -> Self {
        let n = qubo.num_vars();
        let mut linear = vec![0.0; n];
        let mut neighbors = vec![Vec::new(); n];
        for (i, j, c) in qubo.terms() {
            if i == j {
                linear[i] += c;
            } else if c != 0.0 {
                neighbors[i].push((j, c));
                neighbors[j].push((i, c));
            }
        }
        Self { linear, neighbors }
    }

    /// Energy change from flipping bit `i` of `bits`.
    #[must_use]
    pub fn flip_delta(&self, bits: &[u8], i: usize) -> f64 {
        let field = self.linear[i]
            + self.neighbors[i]
                .iter()
                .filter(|(j, _)| bits[*j] == 1)
                .map(|(_, c)| c)
                .sum::<f64>();
        if bits[i] == 0 {
            field
        } else {
            -field
        }
    }

    /// Largest possible single-flip energy change; a natural starting
    /// temperature for annealing.
    #[must_use]
    pub fn max_flip_magnitude(&self) -> f64 {
        self.linear
            .iter()
            .zip(&self.neighbors)
            .map(|(l, row)| l.abs() + row.iter().map(|(_, c)| c.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }
}

/// Converts a trade graph into its weighted max-cut QUBO.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuboFormulator;

impl QuboFormulator {
    /// Build the QUBO for `graph`. Variable `i` is the item with index `i`.
    ///
    /// An empty graph yields a zero-variable QUBO; items without desires
    /// would keep all-zero coefficients.
    #[must_use]
    pub fn build(graph: &TradeGraph) -> Qubo {
        let mut qubo = Qubo::new(graph.num_items());
        for desire in graph.desires() {
            let w = desire.weight;
            qubo.add_linear(desire.first, -w);
            qubo.add_linear(desire.second, -w);
            qubo.add_quadratic(desire.first, desire.second, 2.0 * w);
        }
        qubo
    }
}
