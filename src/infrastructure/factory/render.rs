//! Renderer factory.

use std::sync::Arc;

use crate::adapter::outbound::render::DotRenderer;
use crate::port::Renderer;

/// Build the visualization renderer.
///
/// Graphviz DOT is the only output format.
pub fn build_renderer() -> Arc<dyn Renderer> {
    Arc::new(DotRenderer::new())
}
