use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
///
/// Covers both the TOML settings file and the credentials handed to an
/// optimizer backend. Always raised before any network interaction.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to read desires file {path}: {source}")]
    ReadDesires {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reported by an optimizer backend.
///
/// These are surfaced unchanged to the caller of the orchestration layer.
/// Only [`OptimizerError::Connectivity`] is worth retrying.
#[derive(Error, Debug, Clone)]
pub enum OptimizerError {
    /// `limit` is `None` when the backend rejected the problem without
    /// publishing its bound.
    #[error("{backend}: problem has {actual} {dimension}, {}", capacity_bound(.limit))]
    CapacityExceeded {
        backend: &'static str,
        dimension: &'static str,
        actual: usize,
        limit: Option<usize>,
    },

    #[error("{backend}: connection failed: {reason}")]
    Connectivity {
        backend: &'static str,
        reason: String,
    },

    #[error("{backend}: no answer within {budget:?}")]
    Timeout {
        backend: &'static str,
        budget: Duration,
    },

    #[error("{backend}: invalid response: {reason}")]
    InvalidResponse {
        backend: &'static str,
        reason: String,
    },

    #[error("{backend}: {reason}")]
    Backend {
        backend: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn capacity_bound(limit: &Option<usize>) -> String {
    match limit {
        Some(limit) => format!("backend supports at most {limit}"),
        None => "more than the backend accepts".to_string(),
    }
}

impl Error {
    /// Return `true` for transient failures a caller may retry with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Optimizer(OptimizerError::Connectivity { .. }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
