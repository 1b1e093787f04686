//! Color pipeline: bin parsing, value-to-color resolution, and category
//! colors. Everything here is a pure function of its inputs.

mod bins;
mod category;
mod mapper;

pub use bins::{parse_bins, Bin, BinOp};
pub use category::{category_color, colorize, colorize_labels, CATEGORY_PALETTE_SIZE};
pub use mapper::{resolve, ColorScale, ResolvedColorMatrix};
