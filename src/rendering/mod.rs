pub mod context;
pub mod pipeline;
pub mod visual;

// Re-export main types
pub use context::RenderContext;
pub use pipeline::{DisplayList, DrawCommand};
pub use visual::{Fill, Stroke, Visual};
