//! Data types for the heatmap widget.

mod config;
mod labels;
mod matrix;
mod selection;

pub use config::*;
pub use labels::*;
pub use matrix::*;
pub use selection::*;
