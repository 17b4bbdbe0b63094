//! CLI module graph and command dispatch.

pub mod command;
pub mod config;
pub mod desires;
pub mod diagnostic;
pub mod output;
pub mod solve;

use crate::error::{ConfigError, Error, Result};
use command::{Cli, Commands, ConfigCommand};

/// Run the parsed command line.
///
/// # Errors
///
/// Returns the first error raised by the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Solve(args) => solve::execute(&args).await,
        Commands::Config(ConfigCommand::Show(arg)) => config::execute_show(&arg.config),
        Commands::Config(ConfigCommand::Validate(arg)) => config::execute_validate(&arg.config),
    }
}

/// One-line description of a failure for the terminal.
#[must_use]
pub fn describe(err: &Error) -> String {
    match err {
        Error::Config(inner) => format!("Configuration error: {inner}"),
        other => other.to_string(),
    }
}

/// Follow-up suggestion for failures the user can fix.
#[must_use]
pub fn suggestion(err: &Error) -> Option<&'static str> {
    match err {
        Error::Config(ConfigError::MissingField {
            field: "DWAVE_TOKEN",
        }) => Some("export DWAVE_TOKEN or add it to a .env file"),
        Error::Optimizer(crate::error::OptimizerError::CapacityExceeded { .. }) => {
            Some("try --by-component or a backend with a higher limit")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_prefixed() {
        let err: Error = ConfigError::MissingField {
            field: "DWAVE_TOKEN",
        }
        .into();
        assert_eq!(
            describe(&err),
            "Configuration error: missing required field: DWAVE_TOKEN"
        );
        assert!(suggestion(&err).is_some());
    }

    #[test]
    fn remote_size_rejection_gets_capacity_hint() {
        let err: Error = crate::error::OptimizerError::CapacityExceeded {
            backend: "sapi",
            dimension: "variables",
            actual: 6000,
            limit: None,
        }
        .into();
        assert_eq!(
            suggestion(&err),
            Some("try --by-component or a backend with a higher limit")
        );
    }
}
