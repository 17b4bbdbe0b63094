//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for the remote solver credentials (`DWAVE_TOKEN`, `DWAVE_ENDPOINT`,
//! `DWAVE_SOLVER`).
//!
//! # Example
//!
//! ```no_run
//! use tradecut::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use super::logging::LoggingConfig;
use super::optimizer::{Backend, OptimizerConfig};
use super::retry::RetryConfig;
use crate::error::{ConfigError, Result};
use crate::port::SolverConfig;

/// Environment variable holding the remote solver API token.
pub const TOKEN_ENV: &str = "DWAVE_TOKEN";
/// Environment variable overriding the remote solver endpoint.
pub const ENDPOINT_ENV: &str = "DWAVE_ENDPOINT";
/// Environment variable overriding the remote solver name.
pub const SOLVER_ENV: &str = "DWAVE_SOLVER";

/// Exhaustive search walks `2^n` states in a `u64` counter.
const EXHAUSTIVE_VARIABLE_CEILING: usize = 63;

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults. Load from a
/// TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optimizer backend selection and tuning.
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Caller-side retry for transient optimizer failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Credentials are read from the process environment, never from the
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::parse_toml_unvalidated(content, env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration and apply the environment without validating.
    ///
    /// Callers that override fields afterwards must call
    /// [`Config::validate`] themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_unvalidated<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env);
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] for a file that exists.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let sapi = &mut self.optimizer.sapi;
        sapi.token = non_empty(TOKEN_ENV);
        if let Some(endpoint) = non_empty(ENDPOINT_ENV) {
            sapi.endpoint = endpoint;
        }
        if let Some(solver) = non_empty(SOLVER_ENV) {
            sapi.solver = solver;
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges. Remote credentials are only required when the
    /// `sapi` backend is selected.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let optimizer = &self.optimizer;
        if optimizer.num_reads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "num_reads",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if optimizer.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if optimizer.max_variables == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_variables",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        match optimizer.backend {
            Backend::Exhaustive => {
                if optimizer
                    .max_variables
                    .is_some_and(|n| n > EXHAUSTIVE_VARIABLE_CEILING)
                {
                    return Err(ConfigError::InvalidValue {
                        field: "max_variables",
                        reason: format!(
                            "exhaustive search supports at most {EXHAUSTIVE_VARIABLE_CEILING} variables"
                        ),
                    }
                    .into());
                }
            }
            Backend::Anneal => self.validate_anneal()?,
            Backend::Highs => {}
            Backend::Sapi => self.validate_sapi()?,
        }

        let retry = &self.retry;
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if retry.max_delay_ms < retry.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_anneal(&self) -> Result<()> {
        let anneal = &self.optimizer.anneal;
        if anneal.sweeps == 0 || anneal.reads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "anneal",
                reason: "sweeps and reads must be greater than 0".to_string(),
            }
            .into());
        }
        let temperatures = [
            ("initial_temperature", anneal.initial_temperature),
            ("final_temperature", anneal.final_temperature),
        ];
        for (field, value) in temperatures {
            if value.is_some_and(|t| !(t.is_normal() && t > 0.0)) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be a positive, normal number".to_string(),
                }
                .into());
            }
        }
        if let (Some(initial), Some(last)) = (anneal.initial_temperature, anneal.final_temperature) {
            if last > initial {
                return Err(ConfigError::InvalidValue {
                    field: "final_temperature",
                    reason: "must be <= initial_temperature".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_sapi(&self) -> Result<()> {
        let sapi = &self.optimizer.sapi;
        if sapi.token.is_none() {
            return Err(ConfigError::MissingField { field: TOKEN_ENV }.into());
        }
        let url = Url::parse(&sapi.endpoint).map_err(|e| ConfigError::InvalidValue {
            field: "endpoint",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint",
                reason: "must be an http(s) URL".to_string(),
            }
            .into());
        }
        if sapi.solver.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "solver" }.into());
        }
        if sapi.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Connection parameters handed to the optimizer.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        let optimizer = &self.optimizer;
        let mut config = SolverConfig::new()
            .with_num_reads(optimizer.num_reads)
            .with_timeout(optimizer.timeout())
            .with_endpoint(optimizer.sapi.endpoint.clone())
            .with_solver(optimizer.sapi.solver.clone());
        if let Some(token) = &optimizer.sapi.token {
            config = config.with_token(token.clone());
        }
        config
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
