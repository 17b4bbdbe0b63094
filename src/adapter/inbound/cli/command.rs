//! Command-line interface definitions.
//!
//! Defines the CLI structure for the tradecut application using `clap`.
//! The CLI solves trade networks and inspects configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::adapter::outbound::render::DEFAULT_OUTPUT;
use crate::infrastructure::config::optimizer::Backend;

/// Default configuration file, resolved against the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Match barter trade desires with a max-cut QUBO
#[derive(Parser, Debug)]
#[command(name = "tradecut")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the tradecut CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a trade network and print who trades and who keeps
    Solve(SolveArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `tradecut config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument for commands that read a configuration file.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file (defaults apply when it is missing).
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for the `solve` subcommand.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// Path to the configuration file (defaults apply when it is missing).
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// TOML file of `[[desire]]` entries; the built-in example is used when omitted.
    #[arg(short, long)]
    pub desires: Option<PathBuf>,

    /// Override the configured optimizer backend [exhaustive, anneal, highs, sapi].
    #[arg(short, long)]
    pub backend: Option<Backend>,

    /// Where to write the Graphviz visualization.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Skip writing the visualization.
    #[arg(long)]
    pub no_render: bool,

    /// Solve each connected component as an independent problem.
    #[arg(long)]
    pub by_component: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_solve_flags() {
        let cli = Cli::try_parse_from([
            "tradecut",
            "--json",
            "solve",
            "--backend",
            "exhaustive",
            "--no-render",
            "--by-component",
        ])
        .unwrap();

        assert!(cli.json);
        let Commands::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.backend, Some(Backend::Exhaustive));
        assert!(args.no_render);
        assert!(args.by_component);
        assert_eq!(args.output, PathBuf::from("trade_network_solution.dot"));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["tradecut", "solve", "--backend", "qpu"]).is_err());
    }
}
