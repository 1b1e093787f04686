//! Canvas 2D rendering backend.
//!
//! Paints engine frames with the HTML Canvas 2D API via web-sys. Rectangles,
//! lines and text are all the heatmap needs.

mod measure;
mod renderer;

pub use measure::CanvasTextMeasure;
pub use renderer::CanvasRenderer;
