//! Rendering engine with pluggable backends.
//!
//! This module provides:
//! - The retained frame model (cell and strip pools, label layers)
//! - The redraw algorithm projecting data through the viewport
//! - Canvas 2D backend and SVG serializer
//! - Color parsing, text measurement and legend helpers

pub mod backend;
pub mod cache;
pub mod canvas;
pub mod colors;
pub mod engine;
pub mod frame;
pub mod legend;
pub mod sprites;
pub mod svg;
pub mod text;

// Re-export commonly used types
pub use backend::{RenderBackend, SvgBackend};
pub use cache::CachedMeasure;
pub use canvas::{CanvasRenderer, CanvasTextMeasure};
pub use colors::{palette, parse_color, Rgb, ThemeColors};
pub use engine::{label_font_px, RedrawFlags, RedrawStats, RenderEngine};
pub use frame::{Decorations, Frame, Label, Line, Scrollbar, TextAnchor};
pub use legend::{escape_html, format_value, Legend, LegendItem};
pub use sprites::{CellSprite, Sprite, SpritePool, StripSprite};
pub use svg::{export_svg, frame_to_svg, svg_data_url, SvgExportOptions};
pub use text::{ellipsize, ApproxTextMeasure, Ellipsized, TextMeasure};
