//! Trade network solving use case.
//!
//! [`TradeNetworkSolver`] owns a [`TradeGraph`] and drives the pipeline
//! graph → QUBO → optimizer → interpretation. It never retries: optimizer
//! failures reach the caller unchanged.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::{Assignment, ItemId, QuboFormulator, SolutionInterpreter, TradeGraph, TradeResult};
use crate::error::Result;
use crate::port::{QuboOptimizer, SolverConfig};

/// Builds a trade network and solves it with a pluggable optimizer.
pub struct TradeNetworkSolver {
    graph: TradeGraph,
    optimizer: Arc<dyn QuboOptimizer>,
    config: SolverConfig,
}

impl TradeNetworkSolver {
    /// Create a solver with an empty graph.
    #[must_use]
    pub fn new(optimizer: Arc<dyn QuboOptimizer>, config: SolverConfig) -> Self {
        Self::with_graph(TradeGraph::new(), optimizer, config)
    }

    /// Create a solver over an existing graph.
    #[must_use]
    pub fn with_graph(
        graph: TradeGraph,
        optimizer: Arc<dyn QuboOptimizer>,
        config: SolverConfig,
    ) -> Self {
        Self {
            graph,
            optimizer,
            config,
        }
    }

    /// Record a unit-weight desire between `has` and `wants`.
    ///
    /// # Errors
    ///
    /// See [`TradeGraph::add_trade_desire`].
    pub fn add_trade_desire(
        &mut self,
        has: impl Into<ItemId>,
        wants: impl Into<ItemId>,
    ) -> std::result::Result<(), DomainError> {
        self.graph.add_trade_desire(has, wants)
    }

    /// Record a weighted desire between `has` and `wants`.
    ///
    /// # Errors
    ///
    /// See [`TradeGraph::add_weighted_trade_desire`].
    pub fn add_weighted_trade_desire(
        &mut self,
        has: impl Into<ItemId>,
        wants: impl Into<ItemId>,
        weight: f64,
    ) -> std::result::Result<(), DomainError> {
        self.graph.add_weighted_trade_desire(has, wants, weight)
    }

    #[must_use]
    pub fn graph(&self) -> &TradeGraph {
        &self.graph
    }

    /// Name of the configured optimizer backend.
    #[must_use]
    pub fn optimizer_name(&self) -> &'static str {
        self.optimizer.name()
    }

    /// Solve the whole network as one QUBO.
    ///
    /// Finalizes the graph first. An empty graph yields an empty result
    /// without contacting the optimizer.
    ///
    /// # Errors
    ///
    /// Propagates optimizer failures unchanged, and
    /// [`DomainError::DimensionMismatch`] if the optimizer returns an
    /// assignment of the wrong length.
    pub async fn solve(&mut self) -> Result<(TradeResult, f64)> {
        self.graph.finalize_indices();
        if self.graph.is_empty() {
            debug!("empty trade graph, skipping optimizer");
            return Ok((TradeResult::empty(), 0.0));
        }

        let qubo = QuboFormulator::build(&self.graph);
        info!(
            backend = self.optimizer.name(),
            items = self.graph.num_items(),
            desires = self.graph.num_desires(),
            interactions = qubo.num_interactions(),
            "solving trade network"
        );

        let sample = self.optimizer.solve(&qubo, &self.config).await?;
        let result = SolutionInterpreter::interpret(&self.graph, &sample.assignment, sample.energy)?;
        info!(
            energy = sample.energy,
            cut_weight = result.total_cut_weight,
            executed = result.num_executed(),
            "trade network solved"
        );
        Ok((result, sample.energy))
    }

    /// Solve each connected component as an independent QUBO.
    ///
    /// Components are solved concurrently and merged into one result over
    /// the full graph. The reported energy is the sum of component energies,
    /// which equals the energy of the merged assignment since no interaction
    /// crosses components.
    ///
    /// # Errors
    ///
    /// Fails with the first optimizer error encountered.
    pub async fn solve_by_component(&mut self) -> Result<(TradeResult, f64)> {
        self.graph.finalize_indices();
        if self.graph.is_empty() {
            debug!("empty trade graph, skipping optimizer");
            return Ok((TradeResult::empty(), 0.0));
        }

        let components = self.graph.components();
        let qubos: Vec<_> = components
            .iter()
            .map(|c| QuboFormulator::build(&c.graph))
            .collect();
        info!(
            backend = self.optimizer.name(),
            items = self.graph.num_items(),
            components = components.len(),
            "solving trade network by component"
        );

        let samples = try_join_all(
            qubos
                .iter()
                .map(|qubo| self.optimizer.solve(qubo, &self.config)),
        )
        .await?;

        let mut bits = vec![0u8; self.graph.num_items()];
        let mut energy = 0.0;
        for (component, sample) in components.iter().zip(&samples) {
            let local = sample.assignment.bits();
            if local.len() != component.parent_indices.len() {
                return Err(DomainError::DimensionMismatch {
                    expected: component.parent_indices.len(),
                    actual: local.len(),
                }
                .into());
            }
            for (&parent, &bit) in component.parent_indices.iter().zip(local) {
                bits[parent] = bit;
            }
            debug!(
                items = component.graph.num_items(),
                energy = sample.energy,
                "component solved"
            );
            energy += sample.energy;
        }

        let assignment = Assignment::try_new(bits)?;
        let result = SolutionInterpreter::interpret(&self.graph, &assignment, energy)?;
        info!(
            energy,
            cut_weight = result.total_cut_weight,
            executed = result.num_executed(),
            "trade network solved"
        );
        Ok((result, energy))
    }
}

impl std::fmt::Debug for TradeNetworkSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeNetworkSolver")
            .field("graph", &self.graph)
            .field("optimizer", &self.optimizer.name())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::optimizer::ExhaustiveOptimizer;
    use crate::domain::{Group, Qubo, Sample};
    use crate::error::{Error, OptimizerError};
    use async_trait::async_trait;

    fn solver() -> TradeNetworkSolver {
        TradeNetworkSolver::new(Arc::new(ExhaustiveOptimizer::new()), SolverConfig::default())
    }

    /// Returns a fixed assignment regardless of the problem.
    struct FixedOptimizer(Vec<u8>);

    #[async_trait]
    impl QuboOptimizer for FixedOptimizer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn solve(&self, qubo: &Qubo, _config: &SolverConfig) -> Result<Sample> {
            let assignment = Assignment::try_new(self.0.clone())?;
            let energy = qubo.evaluate(&assignment).unwrap_or(0.0);
            Ok(Sample { assignment, energy })
        }
    }

    struct FailingOptimizer;

    #[async_trait]
    impl QuboOptimizer for FailingOptimizer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn solve(&self, _qubo: &Qubo, _config: &SolverConfig) -> Result<Sample> {
            Err(OptimizerError::Connectivity {
                backend: "failing",
                reason: "unreachable".into(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_four_cycle_trades_everything() {
        let mut solver = solver();
        solver.add_trade_desire("Alice_Bike", "Bob_Laptop").unwrap();
        solver.add_trade_desire("Bob_Laptop", "Charlie_Guitar").unwrap();
        solver.add_trade_desire("Charlie_Guitar", "David_Camera").unwrap();
        solver.add_trade_desire("David_Camera", "Alice_Bike").unwrap();

        let (result, energy) = solver.solve().await.unwrap();

        assert_eq!(energy, -4.0);
        assert_eq!(result.total_cut_weight, 4.0);
        assert_eq!(result.num_executed(), 4);
        assert_eq!(
            result.group_of("Alice_Bike"),
            result.group_of("Charlie_Guitar")
        );
        assert_ne!(result.group_of("Alice_Bike"), result.group_of("Bob_Laptop"));
    }

    #[tokio::test]
    async fn test_solve_finalizes_graph() {
        let mut solver = solver();
        solver.add_trade_desire("A", "B").unwrap();
        solver.solve().await.unwrap();

        assert!(solver.graph().is_finalized());
        assert!(solver.add_trade_desire("A", "B").is_ok());
        assert!(matches!(
            solver.add_trade_desire("A", "Z"),
            Err(DomainError::GraphFinalized { .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_length_assignment_is_dimension_mismatch() {
        let mut solver =
            TradeNetworkSolver::new(Arc::new(FixedOptimizer(vec![0, 1])), SolverConfig::default());
        solver.add_trade_desire("A", "B").unwrap();
        solver.add_trade_desire("B", "C").unwrap();

        let err = solver.solve().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Domain(DomainError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_optimizer_errors_propagate_unchanged() {
        let mut solver = TradeNetworkSolver::new(Arc::new(FailingOptimizer), SolverConfig::default());
        solver.add_trade_desire("A", "B").unwrap();

        let err = solver.solve().await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_by_component_matches_whole_solve() {
        let mut whole = solver();
        let mut split = solver();
        for s in [&mut whole, &mut split] {
            s.add_trade_desire("A", "B").unwrap();
            s.add_trade_desire("B", "C").unwrap();
            s.add_trade_desire("C", "A").unwrap();
            s.add_weighted_trade_desire("X", "Y", 2.5).unwrap();
        }

        let (whole_result, whole_energy) = whole.solve().await.unwrap();
        let (split_result, split_energy) = split.solve_by_component().await.unwrap();

        assert_eq!(whole_energy, -4.5);
        assert_eq!(split_energy, whole_energy);
        assert_eq!(split_result.total_cut_weight, whole_result.total_cut_weight);
        assert_eq!(split_result.assignment.len(), 5);
        assert_ne!(split_result.group_of("X"), split_result.group_of("Y"));
        assert!(matches!(
            split_result.group_of("A"),
            Some(Group::Keep | Group::Trade)
        ));
    }

    #[tokio::test]
    async fn test_empty_graph_by_component() {
        let (result, energy) = solver().solve_by_component().await.unwrap();
        assert!(result.is_empty());
        assert_eq!(energy, 0.0);
    }
}
