//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the external collaborators of the formulation
//! pipeline: optimizer backends and visualization.

pub mod optimizer;
pub mod render;
