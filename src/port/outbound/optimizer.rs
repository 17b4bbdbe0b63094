//! Optimizer port for QUBO backends.
//!
//! Defines the boundary between the formulation pipeline and whatever
//! searches for a low-energy assignment: a remote annealing service or a
//! local classical solver.
//!
//! # Overview
//!
//! - [`QuboOptimizer`]: the backend interface
//! - [`SolverConfig`]: opaque connection parameters passed through to backends

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Qubo, Sample};
use crate::error::Result;

/// Default number of samples requested from sampling backends.
pub const DEFAULT_NUM_READS: u32 = 1000;

/// Default time budget for a single solve.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// QUBO minimization backend.
///
/// # Contract
///
/// On success the returned sample has exactly one bit per QUBO variable and
/// its energy equals `qubo.evaluate(&sample.assignment)`. Among equally good
/// assignments, which one is returned is up to the backend.
///
/// Failures map onto the crate taxonomy:
///
/// - [`ConfigError`](crate::error::ConfigError) for missing or malformed
///   credentials, raised before any network interaction
/// - [`OptimizerError::CapacityExceeded`](crate::error::OptimizerError::CapacityExceeded)
///   when the problem is too large; fatal for the call
/// - [`OptimizerError::Connectivity`](crate::error::OptimizerError::Connectivity)
///   for transient transport failures
/// - [`OptimizerError::Timeout`](crate::error::OptimizerError::Timeout)
///   when `config.timeout()` elapses
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; independent problems may be solved
/// concurrently against the same instance.
#[async_trait]
pub trait QuboOptimizer: Send + Sync {
    /// Return the backend name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Minimize `qubo`.
    ///
    /// `config` is handed through untouched; backends that need no
    /// credentials ignore it.
    async fn solve(&self, qubo: &Qubo, config: &SolverConfig) -> Result<Sample>;
}

/// Connection parameters for an optimizer backend.
///
/// The orchestration layer never reads these fields; it only passes the
/// value along. `Debug` output redacts the token.
#[derive(Clone)]
pub struct SolverConfig {
    token: Option<String>,
    endpoint: Option<String>,
    solver: Option<String>,
    num_reads: u32,
    timeout: Duration,
}

impl SolverConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            endpoint: None,
            solver: None,
            num_reads: DEFAULT_NUM_READS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn with_solver(mut self, solver: impl Into<String>) -> Self {
        self.solver = Some(solver.into());
        self
    }

    #[must_use]
    pub fn with_num_reads(mut self, num_reads: u32) -> Self {
        self.num_reads = num_reads;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    #[must_use]
    pub fn solver(&self) -> Option<&str> {
        self.solver.as_deref()
    }

    #[must_use]
    pub fn num_reads(&self) -> u32 {
        self.num_reads
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("solver", &self.solver)
            .field("num_reads", &self.num_reads)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let config = SolverConfig::new()
            .with_token("secret-token")
            .with_endpoint("https://cloud.dwavesys.com/sapi");
        let debug = format!("{config:?}");

        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("cloud.dwavesys.com"));
    }

    #[test]
    fn defaults_match_sampling_parameters() {
        let config = SolverConfig::default();
        assert_eq!(config.num_reads(), 1000);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.token().is_none());
    }
}
