//! QUBO optimizer backends.
//!
//! Local classical solvers and a client for a remote annealing service,
//! all implementing [`QuboOptimizer`](crate::port::QuboOptimizer).

pub mod anneal;
pub mod exhaustive;
#[cfg(feature = "highs")]
pub mod highs;
pub mod sapi;

pub use anneal::{AnnealConfig, AnnealingOptimizer};
pub use exhaustive::ExhaustiveOptimizer;
#[cfg(feature = "highs")]
pub use highs::HighsOptimizer;
pub use sapi::SapiOptimizer;
