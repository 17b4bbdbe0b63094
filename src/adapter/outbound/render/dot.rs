//! Graphviz DOT rendering of a solved trade network.
//!
//! Nodes are filled by group and executed trades are drawn bold red, so the
//! cut is visible at a glance. Render the file with `dot -Tpng`.

use std::fmt;
use std::fs;
use std::path::Path;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::{Group, TradeGraph, TradeResult};
use crate::error::Result;
use crate::port::Renderer;

/// Default visualization file name.
pub const DEFAULT_OUTPUT: &str = "trade_network_solution.dot";

const KEEP_COLOR: &str = "lightblue";
const TRADE_COLOR: &str = "lightgreen";

#[derive(Debug, Clone)]
struct ItemNode {
    name: String,
    group: Group,
}

impl fmt::Display for ItemNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy)]
struct DesireEdge {
    weight: f64,
    executed: bool,
}

impl fmt::Display for DesireEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weight)
    }
}

/// Writes the partition as an undirected DOT graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotRenderer;

impl DotRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Produce the DOT source without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DimensionMismatch`] if `result` was computed
    /// for a graph of a different size.
    pub fn to_dot(&self, graph: &TradeGraph, result: &TradeResult) -> Result<String> {
        let network = build_network(graph, result)?;

        let body = Dot::with_attr_getters(
            &network,
            &[Config::GraphContentOnly],
            &|_, edge| {
                if edge.weight().executed {
                    "color=\"red\" style=bold penwidth=2".to_string()
                } else {
                    "color=\"gray\" style=dashed".to_string()
                }
            },
            &|_, (_, node)| {
                let color = match node.group {
                    Group::Keep => KEEP_COLOR,
                    Group::Trade => TRADE_COLOR,
                };
                format!("style=filled fillcolor=\"{color}\"")
            },
        )
        .to_string();

        Ok(format!(
            "graph trade_network {{\n    label=\"Trade network (Keep: {KEEP_COLOR}, Trade: {TRADE_COLOR}) cut weight {}, energy {}\";\n    labelloc=t;\n    node [shape=box];\n{body}}}\n",
            result.total_cut_weight, result.energy
        ))
    }
}

impl Renderer for DotRenderer {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn extension(&self) -> &'static str {
        "dot"
    }

    fn render(&self, graph: &TradeGraph, result: &TradeResult, path: &Path) -> Result<()> {
        let source = self.to_dot(graph, result)?;
        fs::write(path, source)?;
        info!(path = %path.display(), items = graph.num_items(), "visualization written");
        Ok(())
    }
}

fn build_network(
    graph: &TradeGraph,
    result: &TradeResult,
) -> Result<UnGraph<ItemNode, DesireEdge>> {
    let bits = result.assignment.bits();
    if bits.len() != graph.num_items() {
        return Err(DomainError::DimensionMismatch {
            expected: graph.num_items(),
            actual: bits.len(),
        }
        .into());
    }

    let mut network = UnGraph::with_capacity(graph.num_items(), graph.num_desires());
    let nodes: Vec<NodeIndex> = graph
        .items()
        .iter()
        .zip(bits)
        .map(|(item, &bit)| {
            network.add_node(ItemNode {
                name: item.to_string(),
                group: Group::from_bit(bit),
            })
        })
        .collect();

    for desire in graph.desires() {
        network.add_edge(
            nodes[desire.first],
            nodes[desire.second],
            DesireEdge {
                weight: desire.weight,
                executed: bits[desire.first] != bits[desire.second],
            },
        );
    }
    Ok(network)
}
