use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tradecut::adapter::outbound::optimizer::ExhaustiveOptimizer;
use tradecut::domain::{Qubo, Sample};
use tradecut::error::{OptimizerError, Result};
use tradecut::port::{QuboOptimizer, SolverConfig};

/// Wraps the exhaustive backend and counts calls.
#[derive(Default)]
pub struct CountingOptimizer {
    inner: ExhaustiveOptimizer,
    calls: AtomicUsize,
}

impl CountingOptimizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuboOptimizer for CountingOptimizer {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn solve(&self, qubo: &Qubo, config: &SolverConfig) -> Result<Sample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.solve(qubo, config).await
    }
}

/// Fails with a connectivity error for the first `failures` calls.
pub struct FlakyOptimizer {
    inner: ExhaustiveOptimizer,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyOptimizer {
    pub fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: ExhaustiveOptimizer::new(),
            failures,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuboOptimizer for FlakyOptimizer {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn solve(&self, qubo: &Qubo, config: &SolverConfig) -> Result<Sample> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(OptimizerError::Connectivity {
                backend: "flaky",
                reason: format!("simulated outage {}", call + 1),
            }
            .into());
        }
        self.inner.solve(qubo, config).await
    }
}
