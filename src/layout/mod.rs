//! Layout: constants per render, coordinate mapping, viewport state and
//! scrollbar math.
//!
//! This module handles:
//! - Margins for labels, category strips, tree panel and scrollbars
//! - Mapping between data indices, viewbox-local cells and pixels
//! - Scroll offsets and zoom in whole cells

mod coords;
mod scrollbox;
mod viewport;

pub use coords::*;
pub use scrollbox::ScrollBox;
pub use viewport::{clamp_cell, initial_cell_size, Viewport, ViewportState};
