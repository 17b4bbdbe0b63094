//! Domain validation errors for trade graph construction and interpretation.
//!
//! These errors are returned when a graph invariant would be violated. A
//! rejected call never leaves the graph partially mutated.
//!
//! # Examples
//!
//! ```
//! use tradecut::domain::error::DomainError;
//! use tradecut::domain::TradeGraph;
//!
//! let mut graph = TradeGraph::new();
//! let result = graph.add_trade_desire("Alice_Bike", "Alice_Bike");
//!
//! assert!(matches!(result, Err(DomainError::InvalidDesire { .. })));
//! assert_eq!(graph.num_items(), 0);
//! ```

use thiserror::Error;

/// Errors that occur when trade graph invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A desire is malformed: a self-loop, or a weight that is negative or not finite.
    #[error("invalid trade desire ({has} <-> {wants}): {reason}")]
    InvalidDesire {
        /// First item of the rejected pair.
        has: String,
        /// Second item of the rejected pair.
        wants: String,
        /// Why the desire was rejected.
        reason: String,
    },

    /// The item set was locked by `finalize_indices` and the desire names a new item.
    #[error("trade graph is finalized; cannot add unknown item '{item}'")]
    GraphFinalized {
        /// The never-seen item.
        item: String,
    },

    /// An assignment does not carry exactly one bit per item.
    #[error("assignment has {actual} entries but the graph has {expected} items")]
    DimensionMismatch {
        /// Number of items (QUBO variables).
        expected: usize,
        /// Length of the supplied assignment.
        actual: usize,
    },

    /// An assignment entry is not 0 or 1.
    #[error("assignment entry {index} is {value}, expected 0 or 1")]
    InvalidBit {
        /// Position of the offending entry.
        index: usize,
        /// The offending value.
        value: u8,
    },
}
