//! Render backend trait for pluggable presentation.
//!
//! The engine produces a backend-neutral `Frame`; a backend turns it into
//! pixels (Canvas 2D) or markup (SVG).

use super::frame::Frame;
use super::svg::frame_to_svg;
use crate::error::Result;

/// A presentation target. Each `present` paints a complete frame.
pub trait RenderBackend {
    /// Surface size in physical pixels.
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    fn present(&mut self, frame: &Frame) -> Result<()>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;
}

/// Keeps the last presented frame as an SVG document.
#[derive(Debug, Default)]
pub struct SvgBackend {
    width: u32,
    height: u32,
    presents: u64,
    last: Option<String>,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn last_svg(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn take_svg(&mut self) -> Option<String> {
        self.last.take()
    }
}

impl RenderBackend for SvgBackend {
    fn resize(&mut self, width: u32, height: u32, _dpr: f32) {
        self.width = width;
        self.height = height;
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.last = Some(frame_to_svg(frame)?);
        self.presents += 1;
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
