//! The redraw algorithm.
//!
//! `RenderEngine` owns the retained frame (cell pool, category strips, label
//! layers, scrollbars, capture overlay) and projects the data model through
//! the viewport into it. Every `redraw` call presents exactly once.

use super::frame::{Frame, Label, Scrollbar, TextAnchor};
use super::text::{char_span_px, ellipsize, highlight_range, TextMeasure};
use crate::error::{HeatviewError, Result};
use crate::layout::{
    CoordinateSpace, LayoutConfig, Rect, ScrollBox, Viewport, LEGIBLE_LABEL_PX,
};
use crate::model::DataModel;
use crate::types::{Axis, CellDefaults, EllipsisPos, Theme};

/// Which layers a redraw rebuilds. Cells are always repositioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawFlags {
    /// Column labels (horizontal scroll).
    pub render_x: bool,
    /// Row labels (vertical scroll).
    pub render_y: bool,
    /// Cell size or data changed: everything.
    pub rescale: bool,
}

impl RedrawFlags {
    pub const ALL: Self = Self {
        render_x: true,
        render_y: true,
        rescale: true,
    };
    pub const CELLS: Self = Self {
        render_x: false,
        render_y: false,
        rescale: false,
    };
    pub const X: Self = Self {
        render_x: true,
        render_y: false,
        rescale: false,
    };
    pub const Y: Self = Self {
        render_x: false,
        render_y: true,
        rescale: false,
    };

    pub fn union(self, other: Self) -> Self {
        Self {
            render_x: self.render_x || other.render_x,
            render_y: self.render_y || other.render_y,
            rescale: self.rescale || other.rescale,
        }
    }

    fn rebuilds(self, axis: Axis) -> bool {
        self.rescale
            || match axis {
                Axis::Row => self.render_y,
                Axis::Col => self.render_x,
            }
    }
}

/// What the last redraw did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawStats {
    /// The 1x1 staging pass ran first.
    pub staged: bool,
    pub cells: usize,
    pub row_labels_rebuilt: bool,
    pub col_labels_rebuilt: bool,
}

/// Label font size for a cell size.
pub fn label_font_px(cell: f64, max_font: f64) -> f64 {
    (cell * 0.8).min(max_font).max(1.0)
}

pub struct RenderEngine {
    frame: Frame,
    layout: LayoutConfig,
    search: Option<String>,
    last: RedrawStats,
}

impl RenderEngine {
    pub fn new(theme: Theme, layout: LayoutConfig) -> Self {
        Self {
            frame: Frame::new(theme),
            layout,
            search: None,
            last: RedrawStats::default(),
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.layout = layout;
    }

    pub fn last_stats(&self) -> RedrawStats {
        self.last
    }

    /// Query used for label highlighting; empty clears it.
    pub fn set_search(&mut self, query: Option<&str>) {
        self.search = query.filter(|q| !q.is_empty()).map(str::to_string);
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Project `model` through `vp` into the frame.
    ///
    /// The first call on an uninitialized viewport runs a 1x1 staging pass,
    /// computes the initial cell size, and then draws everything.
    pub fn redraw(
        &mut self,
        model: &DataModel,
        vp: &mut Viewport,
        flags: RedrawFlags,
        defaults: CellDefaults,
        measure: &mut dyn TextMeasure,
    ) -> Result<&Frame> {
        if model.n_rows() == 0 || model.n_cols() == 0 {
            return Err(HeatviewError::EmptyMatrix(
                "nothing to draw: the matrix has no rows or columns".to_string(),
            ));
        }
        let mut flags = flags;
        let mut stats = RedrawStats::default();

        if !vp.is_initialized() {
            self.stage(model, vp);
            vp.init_cell_size(&self.layout, defaults);
            flags = RedrawFlags::ALL;
            stats.staged = true;
        }

        self.frame.width = vp.width;
        self.frame.height = vp.height;
        vp.compute_view_size(&self.layout);
        let cs = vp.coords(&self.layout);

        stats.cells = self.place_cells(model, vp, &cs);
        self.place_strips(model, vp, &cs, Axis::Row);
        self.place_strips(model, vp, &cs, Axis::Col);

        for axis in [Axis::Row, Axis::Col] {
            if flags.rebuilds(axis) {
                let labels = self.build_labels(model, vp, &cs, axis, measure);
                *self.frame.labels_mut(axis) = labels;
                match axis {
                    Axis::Row => stats.row_labels_rebuilt = true,
                    Axis::Col => stats.col_labels_rebuilt = true,
                }
            }
        }
        self.apply_emphasis();
        self.frame.titles = self.build_titles(model, vp, &cs);
        self.place_scrollbars(vp, &cs);
        self.frame.capture = grid_rect(vp, &cs);

        self.frame.generation += 1;
        self.last = stats;
        tracing::debug!(
            generation = self.frame.generation,
            cells = stats.cells,
            x_start = vp.x_start,
            y_start = vp.y_start,
            "redraw"
        );
        Ok(&self.frame)
    }

    /// Draw a single cell at origin so pools and layout exist before the real
    /// cell size is known.
    fn stage(&mut self, model: &DataModel, vp: &mut Viewport) {
        vp.set_shape(model.n_rows(), model.n_cols());
        vp.x_view = 1;
        vp.y_view = 1;
        let cs = vp.coords(&self.layout);
        self.frame.cells.reserve(1);
        if let (Some(sprite), Some(color)) = (self.frame.cells.get_mut(0), model.color_at(0, 0)) {
            sprite.rect = cs.local_rect(0, 0);
            sprite.color = color;
            sprite.row = 0;
            sprite.col = 0;
            sprite.visible = true;
        }
        tracing::debug!("staging pass");
    }

    fn place_cells(&mut self, model: &DataModel, vp: &Viewport, cs: &CoordinateSpace) -> usize {
        let pool = &mut self.frame.cells;
        pool.reserve((vp.x_view + 1) * (vp.y_view + 1));
        let mut k = 0;
        for row in vp.visible_rows() {
            for col in vp.visible_cols() {
                let (Some(rect), Some(color)) = (cs.cell_rect(row, col), model.color_at(row, col))
                else {
                    continue;
                };
                if let Some(sprite) = pool.get_mut(k) {
                    sprite.rect = rect;
                    sprite.color = color;
                    sprite.row = row;
                    sprite.col = col;
                    sprite.visible = true;
                    k += 1;
                }
            }
        }
        pool.hide_from(k);
        k
    }

    fn place_strips(&mut self, model: &DataModel, vp: &Viewport, cs: &CoordinateSpace, axis: Axis) {
        let n = model.visible_category_count(axis);
        let layout = &self.layout;
        let pool = match axis {
            Axis::Row => &mut self.frame.row_strips,
            Axis::Col => &mut self.frame.col_strips,
        };
        let view = match axis {
            Axis::Row => vp.y_view,
            Axis::Col => vp.x_view,
        };
        pool.reserve((view + 1) * n);
        let cell = cs.cell_size(axis);
        let mut k = 0;
        for index in vp.visible(axis) {
            let lead = cs.item_offset(axis, index);
            for (category, color) in model.category_colors(axis, index).iter().take(n).enumerate()
            {
                let offset = layout.strip_offset(axis, category);
                let rect = match axis {
                    Axis::Row => Rect::new(offset, lead, layout.strip_size - 1.0, cell),
                    Axis::Col => Rect::new(lead, offset, cell, layout.strip_size - 1.0),
                };
                if let Some(sprite) = pool.get_mut(k) {
                    sprite.rect = rect;
                    sprite.color = *color;
                    sprite.index = index;
                    sprite.category = category;
                    sprite.visible = true;
                    k += 1;
                }
            }
        }
        pool.hide_from(k);
    }

    fn build_labels(
        &self,
        model: &DataModel,
        vp: &Viewport,
        cs: &CoordinateSpace,
        axis: Axis,
        measure: &mut dyn TextMeasure,
    ) -> Vec<Label> {
        let layout = &self.layout;
        let cell = cs.cell_size(axis);
        let range = vp.visible(axis);
        if range.is_empty() {
            return Vec::new();
        }
        let edge = layout.label_edge(axis);

        if cell <= LEGIBLE_LABEL_PX {
            let first = cs.item_offset(axis, range.start);
            let last = cs.item_offset(axis, range.end);
            let center = (first + last) / 2.0;
            let text = format!(
                "{} {}\u{2013}{}",
                model.title(axis),
                range.start + 1,
                range.end
            );
            let font_px = layout.max_font_size;
            let width = measure.measure(&text, font_px);
            let label = match axis {
                Axis::Row => Label {
                    text,
                    x: edge - layout.label_space / 2.0,
                    y: center,
                    font_px,
                    width,
                    anchor: TextAnchor::Middle,
                    rotated: true,
                    hit: Rect::new(edge - layout.label_space, first, layout.label_space, last - first),
                    ..Label::default()
                },
                Axis::Col => Label {
                    text,
                    x: center,
                    y: edge - layout.label_space / 2.0,
                    font_px,
                    width,
                    anchor: TextAnchor::Middle,
                    rotated: false,
                    hit: Rect::new(first, edge - layout.label_space, last - first, layout.label_space),
                    ..Label::default()
                },
            };
            return vec![label];
        }

        let font_px = label_font_px(cell, layout.max_font_size);
        let pos = match axis {
            Axis::Row => layout.ellipsis,
            Axis::Col => EllipsisPos::End,
        };
        range
            .filter_map(|index| {
                let name = &model.label(axis, index)?.name;
                let shown = ellipsize(measure, name, layout.label_space, font_px, pos);
                let highlight = self.search.as_deref().and_then(|q| {
                    let chars = highlight_range(name, &shown, q)?;
                    Some(char_span_px(measure, &shown.text, chars, font_px))
                });
                let width = measure.measure(&shown.text, font_px);
                let lead = cs.item_offset(axis, index);
                let label = match axis {
                    Axis::Row => Label {
                        text: shown.text,
                        x: edge,
                        y: lead + cell / 2.0,
                        font_px,
                        width,
                        anchor: TextAnchor::End,
                        rotated: false,
                        index: Some(index),
                        highlight,
                        emphasized: false,
                        hit: Rect::new(edge - layout.label_space, lead, layout.label_space, cell),
                    },
                    Axis::Col => Label {
                        text: shown.text,
                        x: lead + cell / 2.0,
                        y: edge,
                        font_px,
                        width,
                        anchor: TextAnchor::Start,
                        rotated: true,
                        index: Some(index),
                        highlight,
                        emphasized: false,
                        hit: Rect::new(lead, edge - layout.label_space, cell, layout.label_space),
                    },
                };
                Some(label)
            })
            .collect()
    }

    fn build_titles(&self, model: &DataModel, vp: &Viewport, cs: &CoordinateSpace) -> Vec<Label> {
        let layout = &self.layout;
        let grid = grid_rect(vp, cs);
        vec![
            Label {
                text: model.title(Axis::Row).to_string(),
                x: layout.title_center(Axis::Row),
                y: grid.y + grid.h / 2.0,
                font_px: layout.max_font_size,
                anchor: TextAnchor::Middle,
                rotated: true,
                ..Label::default()
            },
            Label {
                text: model.title(Axis::Col).to_string(),
                x: grid.x + grid.w / 2.0,
                y: layout.title_center(Axis::Col),
                font_px: layout.max_font_size,
                anchor: TextAnchor::Middle,
                rotated: false,
                ..Label::default()
            },
        ]
    }

    fn place_scrollbars(&mut self, vp: &Viewport, cs: &CoordinateSpace) {
        let grid = grid_rect(vp, cs);
        let size = self.layout.scrollbar_size;

        let cols = ScrollBox::from_viewport(vp, Axis::Col);
        let (track, thumb) = cols.geometry(Rect::new(grid.x, grid.bottom(), grid.w, size));
        self.frame.col_scrollbar = Scrollbar {
            track,
            thumb,
            visible: cols.visible,
        };

        let rows = ScrollBox::from_viewport(vp, Axis::Row);
        let (track, thumb) = rows.geometry(Rect::new(grid.right(), grid.y, size, grid.h));
        self.frame.row_scrollbar = Scrollbar {
            track,
            thumb,
            visible: rows.visible,
        };
    }

    /// Sync label emphasis with the hovered row/column.
    fn apply_emphasis(&mut self) {
        let hover_row = self.frame.decorations.hover_row;
        let hover_col = self.frame.decorations.hover_col;
        for label in &mut self.frame.row_labels {
            label.emphasized = label.index.is_some() && label.index == hover_row;
        }
        for label in &mut self.frame.col_labels {
            label.emphasized = label.index.is_some() && label.index == hover_col;
        }
    }

    /// Update hover decorations without a full redraw.
    pub fn set_hover(&mut self, cell: Option<(usize, usize, Rect)>) {
        let deco = &mut self.frame.decorations;
        match cell {
            Some((row, col, rect)) => {
                deco.hover_row = Some(row);
                deco.hover_col = Some(col);
                deco.hover_cell = Some(rect);
            }
            None => deco.clear_hover(),
        }
        self.apply_emphasis();
    }
}

#[allow(clippy::cast_precision_loss)]
fn grid_rect(vp: &Viewport, cs: &CoordinateSpace) -> Rect {
    Rect::new(
        cs.origin_x,
        cs.origin_y,
        vp.x_view as f64 * cs.cell_w,
        vp.y_view as f64 * cs.cell_h,
    )
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
    use crate::render::text::ApproxTextMeasure;
    use crate::types::{AxisLabel, ChartConfig};

    fn model(m: usize, n: usize) -> DataModel {
        let rows = (0..m).map(|i| AxisLabel::new(format!("row {i}"))).collect();
        let cols = (0..n).map(|j| AxisLabel::new(format!("col {j}"))).collect();
        #[allow(clippy::cast_precision_loss)]
        let matrix = (0..m)
            .map(|i| (0..n).map(|j| (i + j) as f64).collect())
            .collect();
        DataModel::new(&ChartConfig::new(rows, cols, matrix)).unwrap()
    }

    fn setup(m: usize, n: usize) -> (DataModel, Viewport, RenderEngine) {
        let layout = LayoutConfig::default();
        let vp = Viewport::new(
            layout.margins.left + layout.margins.right + 200.0,
            layout.margins.top + layout.margins.bottom + 100.0,
        );
        (model(m, n), vp, RenderEngine::new(Theme::Dark, layout))
    }

    #[test]
    fn first_redraw_stages_and_sizes_cells() {
        let (dm, mut vp, mut engine) = setup(10, 20);
        let mut measure = ApproxTextMeasure::default();
        let frame = engine
            .redraw(&dm, &mut vp, RedrawFlags::CELLS, CellDefaults::default(), &mut measure)
            .unwrap();
        assert_eq!(frame.generation, 1);
        assert_eq!(frame.cells.visible_count(), 200);
        assert_eq!((vp.cell_w, vp.cell_h), (10.0, 10.0));
        let stats = engine.last_stats();
        assert!(stats.staged);
        assert!(stats.row_labels_rebuilt && stats.col_labels_rebuilt);
    }

    #[test]
    fn pool_reuses_sprites_across_scrolls() {
        let (dm, mut vp, mut engine) = setup(100, 100);
        let mut measure = ApproxTextMeasure::default();
        let defaults = CellDefaults {
            cell_width: Some(20.0),
            cell_height: Some(20.0),
        };
        engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, defaults, &mut measure)
            .unwrap();
        let grows = engine.frame().cells.grow_count();
        for step in 1..5 {
            vp.pan(Some(step), Some(step));
            engine
                .redraw(&dm, &mut vp, RedrawFlags::ALL, defaults, &mut measure)
                .unwrap();
        }
        assert_eq!(engine.frame().cells.grow_count(), grows);
        assert_eq!(engine.frame().generation, 5);
        let first = engine.frame().cells.get(0).unwrap();
        assert_eq!((first.row, first.col), (4, 4));
    }

    #[test]
    fn only_requested_label_layers_are_rebuilt() {
        let (dm, mut vp, mut engine) = setup(100, 100);
        let mut measure = ApproxTextMeasure::default();
        let defaults = CellDefaults {
            cell_width: Some(20.0),
            cell_height: Some(20.0),
        };
        engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, defaults, &mut measure)
            .unwrap();
        vp.pan(Some(3), None);
        engine
            .redraw(&dm, &mut vp, RedrawFlags::X, defaults, &mut measure)
            .unwrap();
        let stats = engine.last_stats();
        assert!(stats.col_labels_rebuilt);
        assert!(!stats.row_labels_rebuilt);
        assert_eq!(engine.frame().col_labels[0].index, Some(3));
    }

    #[test]
    fn tiny_cells_collapse_labels() {
        let (dm, mut vp, mut engine) = setup(50, 50);
        let mut measure = ApproxTextMeasure::default();
        let defaults = CellDefaults {
            cell_width: Some(4.0),
            cell_height: Some(4.0),
        };
        let frame = engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, defaults, &mut measure)
            .unwrap();
        assert_eq!(frame.row_labels.len(), 1);
        assert_eq!(frame.row_labels[0].index, None);
        assert!(frame.row_labels[0].text.starts_with("Rows"));
    }

    #[test]
    fn scrollbars_hide_when_axis_fits() {
        let (dm, mut vp, mut engine) = setup(3, 3);
        let mut measure = ApproxTextMeasure::default();
        let frame = engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, CellDefaults::default(), &mut measure)
            .unwrap();
        assert!(!frame.row_scrollbar.visible);
        assert!(!frame.col_scrollbar.visible);
        assert_eq!(frame.capture.w, 3.0 * vp.cell_w);
    }

    #[test]
    fn hover_emphasizes_labels() {
        let (dm, mut vp, mut engine) = setup(5, 5);
        let mut measure = ApproxTextMeasure::default();
        engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, CellDefaults::default(), &mut measure)
            .unwrap();
        engine.set_hover(Some((2, 1, Rect::default())));
        let frame = engine.frame();
        assert!(frame.row_labels[2].emphasized);
        assert!(!frame.row_labels[1].emphasized);
        assert!(frame.col_labels[1].emphasized);
        engine.set_hover(None);
        assert!(!engine.frame().row_labels[2].emphasized);
    }

    #[test]
    fn search_sets_highlight_band() {
        let (dm, mut vp, mut engine) = setup(5, 5);
        let mut measure = ApproxTextMeasure::default();
        engine.set_search(Some("w 3"));
        let frame = engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, CellDefaults::default(), &mut measure)
            .unwrap();
        assert!(frame.row_labels[3].highlight.is_some());
        assert!(frame.row_labels[2].highlight.is_none());
        assert!(frame.col_labels.iter().all(|l| l.highlight.is_none()));
    }

    #[test]
    fn flipped_model_draws_transposed_grid() {
        let (mut dm, mut vp, mut engine) = setup(2, 3);
        dm.flip();
        let mut measure = ApproxTextMeasure::default();
        let frame = engine
            .redraw(&dm, &mut vp, RedrawFlags::ALL, CellDefaults::default(), &mut measure)
            .unwrap();
        assert_eq!(vp.shape(), (3, 2));
        assert_eq!(frame.row_labels.len(), 3);
        assert_eq!(frame.row_labels[0].text, "col 0");
    }
}
