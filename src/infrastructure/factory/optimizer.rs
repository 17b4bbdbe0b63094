//! Optimizer factory.
//!
//! Maps the `[optimizer]` configuration section onto a concrete
//! [`QuboOptimizer`] implementation.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::adapter::outbound::optimizer::{
    AnnealConfig, AnnealingOptimizer, ExhaustiveOptimizer, SapiOptimizer,
};
use crate::error::Result;
use crate::infrastructure::config::optimizer::{Backend, OptimizerConfig};
use crate::port::QuboOptimizer;

/// Build the optimizer selected by `config.backend`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`](crate::error::ConfigError::InvalidValue) when the `highs` backend is selected
/// but the binary was built without the `highs` feature.
#[allow(clippy::result_large_err)]
pub fn build_optimizer(config: &OptimizerConfig) -> Result<Arc<dyn QuboOptimizer>> {
    debug!(backend = %config.backend, "building optimizer");
    let optimizer: Arc<dyn QuboOptimizer> = match config.backend {
        Backend::Exhaustive => Arc::new(match config.max_variables {
            Some(limit) => ExhaustiveOptimizer::with_max_variables(limit),
            None => ExhaustiveOptimizer::new(),
        }),
        Backend::Anneal => Arc::new(AnnealingOptimizer::new(AnnealConfig {
            max_variables: config
                .max_variables
                .unwrap_or(config.anneal.max_variables),
            ..config.anneal.clone()
        })),
        Backend::Highs => build_highs(config)?,
        Backend::Sapi => {
            let sapi = &config.sapi;
            Arc::new(
                SapiOptimizer::new()
                    .with_poll_interval(Duration::from_millis(sapi.poll_interval_ms))
                    .with_limits(
                        config.max_variables.unwrap_or(sapi.max_variables),
                        sapi.max_interactions,
                    ),
            )
        }
    };
    Ok(optimizer)
}

#[cfg(feature = "highs")]
#[allow(clippy::result_large_err)]
fn build_highs(config: &OptimizerConfig) -> Result<Arc<dyn QuboOptimizer>> {
    use crate::adapter::outbound::optimizer::HighsOptimizer;

    Ok(Arc::new(match config.max_variables {
        Some(limit) => HighsOptimizer::with_max_variables(limit),
        None => HighsOptimizer::new(),
    }))
}

#[cfg(not(feature = "highs"))]
#[allow(clippy::result_large_err)]
fn build_highs(_config: &OptimizerConfig) -> Result<Arc<dyn QuboOptimizer>> {
    Err(crate::error::ConfigError::InvalidValue {
        field: "backend",
        reason: "highs support requires the highs feature".to_string(),
    }
    .into())
}
