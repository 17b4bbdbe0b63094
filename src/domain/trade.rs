//! Interpretation of an optimizer assignment as executed trades.

use std::fmt;

use serde::Serialize;

use super::assignment::Assignment;
use super::error::DomainError;
use super::graph::TradeGraph;
use super::id::ItemId;

/// Partition side of an item.
///
/// The labels are arbitrary: swapping every item's group cuts the same
/// edges. Group identity, not the label, carries meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Keep,
    Trade,
}

impl Group {
    #[must_use]
    pub fn from_bit(bit: u8) -> Self {
        if bit == 1 {
            Self::Trade
        } else {
            Self::Keep
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "Keep"),
            Self::Trade => write!(f, "Trade"),
        }
    }
}

/// A trade desire with its outcome under an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub first: ItemId,
    pub second: ItemId,
    pub weight: f64,
    /// `true` when the endpoints landed in different groups.
    pub executed: bool,
}

/// Outcome of one solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeResult {
    /// Items whose bit is 0, in index order.
    pub keep: Vec<ItemId>,
    /// Items whose bit is 1, in index order.
    pub trade: Vec<ItemId>,
    /// Every desire in canonical order, marked executed or not.
    pub trades: Vec<Trade>,
    /// Total weight of executed trades.
    pub total_cut_weight: f64,
    /// Objective value reported by the optimizer.
    pub energy: f64,
    /// The assignment the result was derived from.
    pub assignment: Assignment,
}

impl TradeResult {
    /// Result of solving a graph with no desires.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            keep: Vec::new(),
            trade: Vec::new(),
            trades: Vec::new(),
            total_cut_weight: 0.0,
            energy: 0.0,
            assignment: Assignment::default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty() && self.keep.is_empty() && self.trade.is_empty()
    }

    /// Desires whose endpoints were separated.
    pub fn executed(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.executed)
    }

    /// Desires whose endpoints stayed together.
    pub fn unexecuted(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| !t.executed)
    }

    #[must_use]
    pub fn num_executed(&self) -> usize {
        self.executed().count()
    }

    /// Group of a named item.
    #[must_use]
    pub fn group_of(&self, item: &str) -> Option<Group> {
        if self.keep.iter().any(|i| i.as_str() == item) {
            Some(Group::Keep)
        } else if self.trade.iter().any(|i| i.as_str() == item) {
            Some(Group::Trade)
        } else {
            None
        }
    }
}

/// Maps assignments back onto a trade graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolutionInterpreter;

impl SolutionInterpreter {
    /// Mark each desire executed iff its endpoints' bits differ.
    ///
    /// Under the formulation in [`QuboFormulator`](super::qubo::QuboFormulator),
    /// the resulting `total_cut_weight` equals minus the QUBO energy of
    /// `assignment`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DimensionMismatch`] if the assignment length
    /// differs from the number of items.
    pub fn interpret(
        graph: &TradeGraph,
        assignment: &Assignment,
        energy: f64,
    ) -> Result<TradeResult, DomainError> {
        if assignment.len() != graph.num_items() {
            return Err(DomainError::DimensionMismatch {
                expected: graph.num_items(),
                actual: assignment.len(),
            });
        }

        let bits = assignment.bits();
        let mut keep = Vec::new();
        let mut trade = Vec::new();
        for (item, &bit) in graph.items().iter().zip(bits) {
            match Group::from_bit(bit) {
                Group::Keep => keep.push(item.clone()),
                Group::Trade => trade.push(item.clone()),
            }
        }

        let items = graph.items();
        let trades: Vec<Trade> = graph
            .desires()
            .map(|d| Trade {
                first: items[d.first].clone(),
                second: items[d.second].clone(),
                weight: d.weight,
                executed: bits[d.first] != bits[d.second],
            })
            .collect();
        let total_cut_weight: f64 = trades.iter().filter(|t| t.executed).map(|t| t.weight).sum();

        Ok(TradeResult {
            keep,
            trade,
            trades,
            total_cut_weight,
            energy,
            assignment: assignment.clone(),
        })
    }
}
