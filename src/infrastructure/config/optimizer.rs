//! Optimizer backend configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapter::outbound::optimizer::sapi::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_INTERACTIONS, DEFAULT_MAX_VARIABLES, DEFAULT_POLL_INTERVAL,
    DEFAULT_SOLVER,
};
use crate::adapter::outbound::optimizer::AnnealConfig;
use crate::error::ConfigError;
use crate::port::{DEFAULT_NUM_READS, DEFAULT_TIMEOUT};

/// Available QUBO backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Brute force over all assignments.
    Exhaustive,
    /// Classical simulated annealing.
    #[default]
    Anneal,
    /// Exact binary program through HiGHS.
    Highs,
    /// Remote quantum annealing service.
    Sapi,
}

impl Backend {
    pub const ALL: [Self; 4] = [Self::Exhaustive, Self::Anneal, Self::Highs, Self::Sapi];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::Anneal => "anneal",
            Self::Highs => "highs",
            Self::Sapi => "sapi",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "backend",
                reason: format!("unknown backend '{s}', expected one of exhaustive, anneal, highs, sapi"),
            })
    }
}

/// `[optimizer]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptimizerConfig {
    /// Which backend minimizes the QUBO. Defaults to `anneal`.
    #[serde(default)]
    pub backend: Backend,

    /// Samples requested from sampling backends.
    ///
    /// Defaults to 1000.
    #[serde(default = "default_num_reads")]
    pub num_reads: u32,

    /// Time budget for a single solve, in seconds.
    ///
    /// Defaults to 60.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Variable limit override for the selected backend.
    #[serde(default)]
    pub max_variables: Option<usize>,

    #[serde(default)]
    pub anneal: AnnealConfig,

    #[serde(default)]
    pub sapi: SapiConfig,
}

fn default_num_reads() -> u32 {
    DEFAULT_NUM_READS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl OptimizerConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            num_reads: default_num_reads(),
            timeout_secs: default_timeout_secs(),
            max_variables: None,
            anneal: AnnealConfig::default(),
            sapi: SapiConfig::default(),
        }
    }
}

/// `[optimizer.sapi]` section.
///
/// The token is never read from the file; it comes from `DWAVE_TOKEN`.
#[derive(Clone, Deserialize, Serialize)]
pub struct SapiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_solver")]
    pub solver: String,

    /// Delay between status polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Coupler limit of the target solver.
    #[serde(default = "default_max_interactions")]
    pub max_interactions: usize,

    /// Qubit limit of the target solver.
    #[serde(default = "default_sapi_max_variables")]
    pub max_variables: usize,

    /// API token from `DWAVE_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_solver() -> String {
    DEFAULT_SOLVER.into()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_max_interactions() -> usize {
    DEFAULT_MAX_INTERACTIONS
}

fn default_sapi_max_variables() -> usize {
    DEFAULT_MAX_VARIABLES
}

impl Default for SapiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            solver: default_solver(),
            poll_interval_ms: default_poll_interval_ms(),
            max_interactions: default_max_interactions(),
            max_variables: default_sapi_max_variables(),
            token: None,
        }
    }
}

impl fmt::Debug for SapiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SapiConfig")
            .field("endpoint", &self.endpoint)
            .field("solver", &self.solver)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_interactions", &self.max_interactions)
            .field("max_variables", &self.max_variables)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("SAPI".parse::<Backend>().unwrap(), Backend::Sapi);
        assert_eq!(" highs ".parse::<Backend>().unwrap(), Backend::Highs);
    }

    #[test]
    fn unknown_backend_lists_choices() {
        let err = "qpu".parse::<Backend>().unwrap_err();
        assert!(err.to_string().contains("exhaustive, anneal, highs, sapi"));
    }

    #[test]
    fn backend_display_round_trips() {
        for backend in Backend::ALL {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn sapi_debug_redacts_token() {
        let config = SapiConfig {
            token: Some("secret".into()),
            ..SapiConfig::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
