//! Adapters implementing the domain ports.

pub mod http;
pub mod mock;
pub mod svg_renderer;

pub use svg_renderer::SvgTableRenderer;
