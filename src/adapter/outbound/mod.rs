//! Outbound adapters (driven side).

pub mod optimizer;
pub mod render;
