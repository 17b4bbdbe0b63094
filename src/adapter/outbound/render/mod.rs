//! Visualization adapters.

pub mod dot;

pub use dot::{DotRenderer, DEFAULT_OUTPUT};
