//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  TradeNetworkSolver     │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌──────────────────────────────┐                     ┌───────────┐
//! │ Optimizer Adapters           │                     │ Renderer  │
//! │ exhaustive/anneal/highs/sapi │                     │  Adapter  │
//! └──────────────────────────────┘                     └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`QuboOptimizer`] - QUBO minimization backend
//! - [`Renderer`] - Visualization of a solved network

pub mod outbound;

pub use outbound::optimizer::{QuboOptimizer, SolverConfig, DEFAULT_NUM_READS, DEFAULT_TIMEOUT};
pub use outbound::render::Renderer;
