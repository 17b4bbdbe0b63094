//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration. These factories handle dependency
//! injection and wiring.
//!
//! # Submodules
//!
//! - [`optimizer`] - QUBO optimizer backend construction
//! - [`render`] - Visualization renderer construction

pub mod optimizer;
pub mod render;

pub use optimizer::build_optimizer;
pub use render::build_renderer;
