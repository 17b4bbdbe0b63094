//! Infrastructure configuration modules.

pub mod logging;
pub mod optimizer;
pub mod retry;
pub mod settings;

pub use settings::Config;
