//! heatview - interactive matrix heatmap for the web
//!
//! Renders a labeled numeric matrix as a pannable, zoomable cell grid in the
//! browser via WebAssembly and Canvas 2D:
//! - Threshold bins or white-to-color gradients
//! - Row/column category strips, sorting and drag reordering
//! - Rectangular selection, hover tooltips and label search
//! - Only the visible window is ever drawn; large matrices stay responsive
//! - SVG export of the visible window or the full matrix
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { HeatView } from 'heatview';
//! await init();
//! const view = new HeatView({ element, rows, cols, matrix, color });
//! view.update({ matrix: next });
//! view.downloadSVG({ fileName: 'genes', full: true });
//! ```

// Data and color resolution
pub mod color;
pub mod error;
pub mod model;
pub mod sort;
pub mod types;

// Geometry, gestures and rendering
pub mod chart;
pub mod interact;
pub mod layout;
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

// Re-export the main widget struct
pub use viewer::HeatView;

pub use chart::{Chart, ChartEvent, TreeRequest};
pub use error::{ColorMappingError, HeatviewError, Result};
pub use types::*;

/// Validate a chart config JSON string and return its normalized state
/// (`{ rows, cols, matrix }`) as JSON.
///
/// # Errors
/// Returns an error if the config is malformed or fails validation.
#[wasm_bindgen(js_name = "validateConfig")]
pub fn validate_config(json: &str) -> std::result::Result<String, JsValue> {
    let config = ChartConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let model = model::DataModel::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&model.state())
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
