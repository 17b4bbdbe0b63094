//! Loading trade desires from TOML.
//!
//! ```toml
//! [[desire]]
//! has = "Alice_Bike"
//! wants = "Bob_Laptop"
//! weight = 2.0   # optional, defaults to 1.0
//! ```

use std::path::Path;

use serde::Deserialize;

use super::diagnostic;
use crate::domain::{TradeGraph, DEFAULT_WEIGHT};
use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
struct DesiresFile {
    #[serde(default, rename = "desire")]
    desires: Vec<DesireEntry>,
}

#[derive(Debug, Deserialize)]
struct DesireEntry {
    has: String,
    wants: String,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

/// The four-party barter cycle: Alice has a bike and wants Bob's laptop,
/// Bob wants Charlie's guitar, Charlie wants David's camera, and David
/// wants Alice's bike.
#[must_use]
pub fn example_graph() -> TradeGraph {
    let mut graph = TradeGraph::new();
    for (has, wants) in [
        ("Alice_Bike", "Bob_Laptop"),
        ("Bob_Laptop", "Charlie_Guitar"),
        ("Charlie_Guitar", "David_Camera"),
        ("David_Camera", "Alice_Bike"),
    ] {
        // distinct literals, cannot fail
        let _ = graph.add_trade_desire(has, wants);
    }
    graph
}

/// Build a graph from desires TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML and a domain error for
/// the first rejected desire.
#[allow(clippy::result_large_err)]
pub fn parse(content: &str) -> Result<TradeGraph> {
    let file: DesiresFile = toml::from_str(content).map_err(ConfigError::Parse)?;
    let mut graph = TradeGraph::new();
    for entry in file.desires {
        graph.add_weighted_trade_desire(entry.has, entry.wants, entry.weight)?;
    }
    Ok(graph)
}

/// Read and parse a desires file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadDesires`] if the file cannot be read, otherwise
/// as [`parse`]. Parse errors are additionally rendered with the offending
/// span.
#[allow(clippy::result_large_err)]
pub fn load(path: &Path) -> Result<TradeGraph> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadDesires {
        path: path.display().to_string(),
        source,
    })?;
    parse(&content).map_err(|err| {
        diagnostic::report_parse_error(
            &err,
            &path.display().to_string(),
            &content,
            "each [[desire]] needs string `has` and `wants` keys and an optional numeric `weight`",
        );
        err
    })
}
