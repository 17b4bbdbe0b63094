//! Trade matching domain: desire graph, QUBO formulation, assignments, and results.

pub mod assignment;
pub mod error;
pub mod graph;
pub mod id;
pub mod qubo;
pub mod trade;

pub use assignment::{Assignment, Sample};
pub use graph::{Component, TradeDesire, TradeGraph, DEFAULT_WEIGHT};
pub use id::ItemId;
pub use qubo::{Couplings, Qubo, QuboFormulator};
pub use trade::{Group, SolutionInterpreter, Trade, TradeResult};
