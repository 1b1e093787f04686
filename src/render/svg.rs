//! SVG serialization of a frame.
//!
//! Exports either the visible window (the current frame) or the full matrix,
//! which is drawn off-screen on a viewport large enough to hold every cell.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::engine::{RedrawFlags, RenderEngine};
use super::frame::{Frame, Label, TextAnchor};
use super::text::{TextMeasure, FONT_FAMILY};
use crate::error::{HeatviewError, Result};
use crate::layout::{LayoutConfig, Viewport};
use crate::model::DataModel;
use crate::render::colors::palette;
use crate::types::{CellDefaults, Theme};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Default download name.
pub const DEFAULT_FILE_NAME: &str = "heatmap.svg";

/// `downloadSVG` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgExportOptions {
    pub file_name: Option<String>,
    /// Export the whole matrix instead of the visible window.
    pub full: bool,
}

impl SvgExportOptions {
    /// File name with an `.svg` extension.
    pub fn file_name(&self) -> String {
        match self.file_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                if name.to_ascii_lowercase().ends_with(".svg") {
                    name.to_string()
                } else {
                    format!("{name}.svg")
                }
            }
            _ => DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Serialize what `frame` shows: cells, category strips, labels and titles.
/// Scrollbars and gesture decorations are not exported.
pub fn frame_to_svg(frame: &Frame) -> Result<String> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let width = num(frame.width);
    let height = num(frame.height);
    let view_box = format!("0 0 {width} {height}");
    let root = BytesStart::new("svg").with_attributes([
        ("xmlns", SVG_NS),
        ("width", width.as_str()),
        ("height", height.as_str()),
        ("viewBox", view_box.as_str()),
        ("font-family", FONT_FAMILY),
    ]);
    w.write_event(Event::Start(root))?;

    rect(&mut w, 0.0, 0.0, frame.width, frame.height, frame.colors.background)?;

    group(&mut w, "cells", |w| {
        for cell in frame.cells.visible() {
            let r = cell.rect;
            rect(w, r.x, r.y, r.w, r.h, &cell.color.to_hex())?;
        }
        Ok(())
    })?;

    group(&mut w, "strips", |w| {
        for strip in frame.row_strips.visible().chain(frame.col_strips.visible()) {
            let r = strip.rect;
            rect(w, r.x, r.y, r.w, r.h, &strip.color.to_hex())?;
        }
        Ok(())
    })?;

    group(&mut w, "labels", |w| {
        for label in frame.row_labels.iter().chain(&frame.col_labels).chain(&frame.titles) {
            text(w, label, frame.colors.text)?;
        }
        Ok(())
    })?;

    w.write_event(Event::End(BytesEnd::new("svg")))?;
    String::from_utf8(w.into_inner().into_inner())
        .map_err(|e| HeatviewError::Render(format!("SVG is not UTF-8: {e}")))
}

/// Export the visible window, or with `full` the whole matrix at the current
/// cell size.
pub fn export_svg(
    model: &DataModel,
    vp: &Viewport,
    layout: &LayoutConfig,
    theme: Theme,
    full: bool,
    measure: &mut dyn TextMeasure,
) -> Result<String> {
    let mut target = vp.clone();
    if full {
        let (w, h) = full_size(model, vp, layout);
        // Half a pixel of slack so flooring never drops the last cell.
        target.resize(w + 0.5, h + 0.5);
        target.pan(Some(0), Some(0));
    }
    let defaults = current_cell_size(vp);
    let mut engine = RenderEngine::new(theme, layout.clone());
    let frame = engine.redraw(model, &mut target, RedrawFlags::ALL, defaults, measure)?;
    tracing::debug!(full, cells = frame.cells.visible_count(), "svg export");
    frame_to_svg(frame)
}

#[allow(clippy::cast_precision_loss)]
fn full_size(model: &DataModel, vp: &Viewport, layout: &LayoutConfig) -> (f64, f64) {
    (
        layout.margins.left + layout.margins.right + model.n_cols() as f64 * vp.cell_w,
        layout.margins.top + layout.margins.bottom + model.n_rows() as f64 * vp.cell_h,
    )
}

#[allow(clippy::cast_possible_truncation)]
fn current_cell_size(vp: &Viewport) -> CellDefaults {
    CellDefaults {
        cell_width: Some(vp.cell_w as f32),
        cell_height: Some(vp.cell_h as f32),
    }
}

/// `data:` URL for an SVG document.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg.as_bytes()))
}

type SvgWriter = Writer<Cursor<Vec<u8>>>;

fn group<F>(w: &mut SvgWriter, class: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut SvgWriter) -> Result<()>,
{
    w.write_event(Event::Start(
        BytesStart::new("g").with_attributes([("class", class)]),
    ))?;
    body(w)?;
    w.write_event(Event::End(BytesEnd::new("g")))?;
    Ok(())
}

fn rect(w: &mut SvgWriter, x: f64, y: f64, width: f64, height: f64, fill: &str) -> Result<()> {
    let (x, y, width, height) = (num(x), num(y), num(width), num(height));
    w.write_event(Event::Empty(BytesStart::new("rect").with_attributes([
        ("x", x.as_str()),
        ("y", y.as_str()),
        ("width", width.as_str()),
        ("height", height.as_str()),
        ("fill", fill),
    ])))?;
    Ok(())
}

fn text(w: &mut SvgWriter, label: &Label, fill: &str) -> Result<()> {
    if label.text.is_empty() {
        return Ok(());
    }
    let transform = label
        .rotated
        .then(|| format!("rotate(-90 {} {})", num(label.x), num(label.y)));

    if let Some(band) = label.highlight_rect() {
        let (x, y, bw, bh) = (num(band.x), num(band.y), num(band.w), num(band.h));
        let mut el = BytesStart::new("rect").with_attributes([
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", bw.as_str()),
            ("height", bh.as_str()),
            ("fill", palette::SEARCH_HIGHLIGHT),
        ]);
        if let Some(t) = &transform {
            el.push_attribute(("transform", t.as_str()));
        }
        w.write_event(Event::Empty(el))?;
    }

    let anchor = match label.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let (x, y, size) = (num(label.x), num(label.y), num(label.font_px));
    let mut el = BytesStart::new("text").with_attributes([
        ("x", x.as_str()),
        ("y", y.as_str()),
        ("font-size", size.as_str()),
        ("text-anchor", anchor),
        ("dominant-baseline", "central"),
        ("fill", fill),
    ]);
    if label.emphasized {
        el.push_attribute(("font-weight", "bold"));
    }
    if let Some(t) = &transform {
        el.push_attribute(("transform", t.as_str()));
    }
    w.write_event(Event::Start(el))?;
    w.write_event(Event::Text(BytesText::new(&label.text)))?;
    w.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}

/// Coordinates with at most two decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn file_name_gets_extension() {
        let opts = SvgExportOptions {
            file_name: Some("matrix".into()),
            full: false,
        };
        assert_eq!(opts.file_name(), "matrix.svg");
        assert_eq!(SvgExportOptions::default().file_name(), DEFAULT_FILE_NAME);
        let opts = SvgExportOptions {
            file_name: Some("a.SVG".into()),
            full: true,
        };
        assert_eq!(opts.file_name(), "a.SVG");
    }

    #[test]
    fn empty_frame_is_valid_svg() {
        let mut frame = Frame::new(Theme::Light);
        frame.width = 10.0;
        frame.height = 20.0;
        let svg = frame_to_svg(&frame).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 10 20""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn data_url_is_base64() {
        assert_eq!(svg_data_url("<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }
}
