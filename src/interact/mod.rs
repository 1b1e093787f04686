//! Pointer-driven controllers: selection, drag reorder, hover, and search.
//!
//! None of these touch the DOM; the chart feeds them normalized positions.

mod hover;
mod reorder;
mod search;
mod selection;

pub use hover::{default_tooltip_html, HoverChange, HoverTracker};
pub use reorder::{drop_destination, DragReorder};
pub use search::{find_matches, fold_case, SearchState};
pub use selection::{clamp_to_view, SelectionController, SelectionGesture};
