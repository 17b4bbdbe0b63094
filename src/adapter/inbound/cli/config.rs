//! Handler for the `config` command group and shared config loading.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{diagnostic, output};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::optimizer::Backend;
use crate::infrastructure::config::Config;

/// Load and validate the configuration at `path`, or defaults when it does
/// not exist.
///
/// Parse errors are additionally rendered with the offending span.
#[allow(clippy::result_large_err)]
pub fn load(path: &Path) -> Result<Config> {
    load_with_backend(path, None)
}

/// Like [`load`], but a `backend` override replaces the configured backend
/// before validation so credentials are only demanded for the backend that
/// actually runs.
#[allow(clippy::result_large_err)]
pub fn load_with_backend(path: &Path, backend: Option<Backend>) -> Result<Config> {
    let mut config = read(path)?;
    if let Some(backend) = backend {
        config.optimizer.backend = backend;
    }
    config.validate()?;
    Ok(config)
}

#[allow(clippy::result_large_err)]
fn read(path: &Path) -> Result<Config> {
    let env = |key: &str| std::env::var(key).ok();
    if !path.exists() {
        return Config::parse_toml_unvalidated("", env);
    }
    let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
    Config::parse_toml_unvalidated(&content, env).map_err(|err| {
        diagnostic::report_parse_error(
            &err,
            &path.display().to_string(),
            &content,
            "see `tradecut config show` for the expected layout",
        );
        err
    })
}

/// Execute `config show`.
#[allow(clippy::result_large_err)]
pub fn execute_show(path: &Path) -> Result<()> {
    let config = read(path)?;
    let invalid = config.validate().err();

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "exists": path.exists(),
            "valid": invalid.is_none(),
            "config": config,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    if !path.exists() {
        output::hint(&format!("{} not found, showing defaults", path.display()));
    }
    if let Some(err) = &invalid {
        output::hint(&format!("not valid as written: {err}"));
    }

    let optimizer = &config.optimizer;
    output::section("Optimizer");
    output::field("Backend", optimizer.backend);
    output::field("Num reads", optimizer.num_reads);
    output::field("Timeout", format!("{}s", optimizer.timeout_secs));
    if let Some(limit) = optimizer.max_variables {
        output::field("Max variables", limit);
    }

    match optimizer.backend {
        Backend::Anneal => {
            output::section("Annealing");
            output::field("Sweeps", optimizer.anneal.sweeps);
            output::field("Reads", optimizer.anneal.reads);
            output::field(
                "Seed",
                optimizer
                    .anneal
                    .seed
                    .map_or_else(|| "random".to_string(), |s| s.to_string()),
            );
        }
        Backend::Sapi => {
            let sapi = &optimizer.sapi;
            output::section("Remote solver");
            output::field("Endpoint", &sapi.endpoint);
            output::field("Solver", &sapi.solver);
            output::field("Poll interval", format!("{}ms", sapi.poll_interval_ms));
            output::field(
                "Token",
                if sapi.token.is_some() { "set" } else { "missing" },
            );
        }
        Backend::Exhaustive | Backend::Highs => {}
    }

    output::section("Retry");
    output::field("Max attempts", config.retry.max_attempts);
    output::field("Initial delay", format!("{}ms", config.retry.initial_delay_ms));
    output::field("Max delay", format!("{}ms", config.retry.max_delay_ms));
    output::field("Backoff", config.retry.backoff_multiplier);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`.
#[allow(clippy::result_large_err)]
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "backend": config.optimizer.backend,
        }));
        return Ok(());
    }

    output::success(&format!("{} is valid", path.display()));
    output::field("Backend", config.optimizer.backend);
    Ok(())
}
