//! Visualization port.
//!
//! Renders a solved trade network to a file. Plays no part in correctness.

use std::path::Path;

use crate::domain::{TradeGraph, TradeResult};
use crate::error::Result;

/// Writes a picture of the partition and its cut edges.
pub trait Renderer: Send + Sync {
    /// Return the renderer name for logging.
    fn name(&self) -> &'static str;

    /// File extension (without dot) of the produced artifact.
    fn extension(&self) -> &'static str;

    /// Render `result` over `graph` into `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written or `result` does not
    /// belong to `graph`.
    fn render(&self, graph: &TradeGraph, result: &TradeResult, path: &Path) -> Result<()>;
}
