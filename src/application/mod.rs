//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod network;
pub mod retry;

pub use network::TradeNetworkSolver;
pub use retry::RetryPolicy;
