//! The widget controller.
//!
//! `Chart` owns the data model, the viewport, the layout and the render
//! engine, and exposes every widget operation as a method. Pointer input
//! arrives as surface-relative CSS pixels; callbacks leave as `ChartEvent`s.
//! Nothing here touches the DOM, so the whole controller runs natively.

use serde::Serialize;

use crate::error::Result;
use crate::interact::{
    clamp_to_view, DragReorder, HoverChange, HoverTracker, SearchState, SelectionController,
    SelectionGesture,
};
use crate::layout::{CoordinateSpace, LayoutConfig, Viewport, ViewportState};
use crate::model::DataModel;
use crate::render::{
    export_svg, Frame, Legend, Line, RedrawFlags, RedrawStats, RenderEngine, TextMeasure,
};
use crate::sort::{SortDirection, SortKey};
use crate::types::{
    Axis, CellDefaults, CellEntry, ChartConfig, ChartOptions, ChartState, ColorConfig, DataUpdate,
    HoverInfo, Theme,
};

/// Something the embedding should forward to a user callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// `onSelection`: every cell of the selected rectangle, row-major.
    Selection(Vec<CellEntry>),
    /// `onClick`: a single cell.
    Click(CellEntry),
    /// `onHover`: the pointer entered a new cell.
    Hover(HoverInfo),
    /// The pointer left the grid.
    HoverEnd,
}

/// Payload for the tree side panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRequest {
    pub newick: String,
    pub width: f64,
    pub height: f64,
}

fn layout_for(model: &DataModel, options: &ChartOptions, tree: bool) -> LayoutConfig {
    LayoutConfig::new(
        options,
        model.visible_category_count(Axis::Row),
        model.visible_category_count(Axis::Col),
        tree,
    )
}

pub struct Chart {
    model: DataModel,
    options: ChartOptions,
    defaults: CellDefaults,
    newick: Option<String>,
    viewport: Viewport,
    engine: RenderEngine,
    selection: SelectionController,
    row_drag: DragReorder,
    col_drag: DragReorder,
    hover: HoverTracker,
    search: SearchState,
    legend: Legend,
    /// Layers to rebuild on the next render.
    pending: Option<RedrawFlags>,
    /// Overlays changed without a redraw.
    decorations_dirty: bool,
}

impl Chart {
    /// Validate `config` and build a chart for a `width` x `height` surface.
    /// Nothing is drawn until the first `render`.
    pub fn new(config: &ChartConfig, width: f64, height: f64) -> Result<Self> {
        let model = DataModel::new(config)?;
        let legend = Legend::build(&config.options, model.color_config(), &model.stats())?;
        let layout = layout_for(&model, &config.options, config.newick.is_some());
        let mut viewport = Viewport::new(width, height);
        viewport.set_shape(model.n_rows(), model.n_cols());
        Ok(Self {
            engine: RenderEngine::new(config.options.theme(), layout),
            model,
            options: config.options.clone(),
            defaults: config.defaults,
            newick: config.newick.clone(),
            viewport,
            selection: SelectionController::new(),
            row_drag: DragReorder::new(Axis::Row),
            col_drag: DragReorder::new(Axis::Col),
            hover: HoverTracker::new(),
            search: SearchState::new(),
            legend,
            pending: Some(RedrawFlags::ALL),
            decorations_dirty: false,
        })
    }

    pub fn model(&self) -> &DataModel {
        &self.model
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn layout(&self) -> &LayoutConfig {
        self.engine.layout()
    }

    pub fn frame(&self) -> &Frame {
        self.engine.frame()
    }

    /// What the last redraw rebuilt.
    pub fn last_stats(&self) -> RedrawStats {
        self.engine.last_stats()
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn theme(&self) -> Theme {
        self.options.theme()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Metadata warnings for the console.
    pub fn warnings(&self) -> &[String] {
        self.model.warnings()
    }

    /// Snapshot for `getState()`.
    pub fn state(&self) -> ChartState {
        self.model.state()
    }

    fn invalidate(&mut self, flags: RedrawFlags) {
        self.pending = Some(self.pending.map_or(flags, |p| p.union(flags)));
    }

    /// Rebuild every layer on the next render, e.g. once web fonts loaded.
    pub fn refresh(&mut self) {
        self.invalidate(RedrawFlags::ALL);
    }

    pub fn needs_render(&self) -> bool {
        self.pending.is_some() || self.decorations_dirty
    }

    /// Bring the frame up to date. Returns true when it changed and should be
    /// presented (once).
    pub fn render(&mut self, measure: &mut dyn TextMeasure) -> Result<bool> {
        let mut changed = false;
        if let Some(flags) = self.pending.take() {
            self.engine.redraw(
                &self.model,
                &mut self.viewport,
                flags,
                self.defaults,
                measure,
            )?;
            changed = true;
            self.decorations_dirty = true;
        }
        if self.decorations_dirty {
            self.sync_decorations();
            self.decorations_dirty = false;
            changed = true;
        }
        Ok(changed)
    }

    /// Pixel mapping for the current scroll position and cell size.
    pub fn coords(&self) -> CoordinateSpace {
        self.viewport.coords(self.engine.layout())
    }

    /// Recompute overlay geometry from controller state.
    fn sync_decorations(&mut self) {
        self.selection.clamp_to(self.viewport.x_view, self.viewport.y_view);
        let cs = self.coords();
        let selection = self
            .selection
            .selection()
            .map(|b| cs.local_span(b.x, b.y, b.x2, b.y2));
        let guide = self.guide_line(&cs);
        let hovered = self.hover.current().and_then(|(row, col)| {
            let visible = self.viewport.visible_rows().contains(&row)
                && self.viewport.visible_cols().contains(&col);
            let rect = cs.cell_rect(row, col)?;
            visible.then_some((row, col, rect))
        });

        let deco = &mut self.engine.frame_mut().decorations;
        deco.selection = selection;
        deco.drag_guide = guide;
        self.engine.set_hover(hovered);
    }

    #[allow(clippy::cast_precision_loss)]
    fn guide_line(&self, cs: &CoordinateSpace) -> Option<Line> {
        let drag = [&self.row_drag, &self.col_drag]
            .into_iter()
            .find(|d| d.is_dragging())?;
        let boundary = drag.boundary()?;
        let axis = drag.axis();
        let range = self.viewport.visible(axis);
        if boundary < range.start || boundary > range.end {
            return None;
        }
        let layout = self.engine.layout();
        let pos = cs.item_offset(axis, boundary);
        let grid_right = cs.origin_x + self.viewport.x_view as f64 * cs.cell_w;
        let grid_bottom = cs.origin_y + self.viewport.y_view as f64 * cs.cell_h;
        Some(match axis {
            Axis::Row => Line {
                x1: layout.label_edge(Axis::Row) - layout.label_space,
                y1: pos,
                x2: grid_right,
                y2: pos,
            },
            Axis::Col => Line {
                x1: pos,
                y1: layout.label_edge(Axis::Col) - layout.label_space,
                x2: pos,
                y2: grid_bottom,
            },
        })
    }

    // ---- viewport ----

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.invalidate(RedrawFlags::ALL);
    }

    /// Scroll to absolute start indices. Returns true when anything moved.
    pub fn pan(&mut self, x_start: Option<usize>, y_start: Option<usize>) -> bool {
        let before = (self.viewport.x_start, self.viewport.y_start);
        if !self.viewport.pan(x_start, y_start) {
            return false;
        }
        self.invalidate_scroll(before);
        true
    }

    /// Scroll by whole cells.
    pub fn pan_by(&mut self, dx: isize, dy: isize) -> bool {
        let before = (self.viewport.x_start, self.viewport.y_start);
        if !self.viewport.pan_by(dx, dy) {
            return false;
        }
        self.invalidate_scroll(before);
        true
    }

    fn invalidate_scroll(&mut self, before: (usize, usize)) {
        self.invalidate(RedrawFlags {
            render_x: self.viewport.x_start != before.0,
            render_y: self.viewport.y_start != before.1,
            rescale: false,
        });
    }

    /// Change the cell size by `delta` zoom steps on `axis` (both when `None`).
    pub fn zoom(&mut self, delta: f64, axis: Option<Axis>) -> bool {
        let changed = self.viewport.zoom(delta, axis);
        if changed {
            self.invalidate(RedrawFlags::ALL);
        }
        changed
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.viewport.set_locked(locked);
        self.invalidate(RedrawFlags::ALL);
    }

    pub fn is_locked(&self) -> bool {
        self.viewport.locked
    }

    // ---- data ----

    /// Rebuild everything derived from the data after a structural change.
    fn after_data_change(&mut self) {
        let layout = layout_for(&self.model, &self.options, self.newick.is_some());
        self.engine.set_layout(layout);
        self.search.refresh(&self.model);
        self.selection.cancel();
        self.row_drag.cancel();
        self.col_drag.cancel();
        self.hover.reset();
        self.invalidate(RedrawFlags::ALL);
    }

    /// `update(...)`: replace data wholesale, reset scroll and cell size.
    pub fn update(&mut self, update: DataUpdate) -> Result<()> {
        self.model.update(update)?;
        self.legend = Legend::build(&self.options, self.model.color_config(), &self.model.stats())?;
        self.viewport
            .set_shape(self.model.n_rows(), self.model.n_cols());
        self.viewport.invalidate();
        self.after_data_change();
        Ok(())
    }

    /// Swap rows and columns.
    pub fn flip_axis(&mut self) {
        self.model.flip();
        self.viewport.flip();
        self.after_data_change();
        tracing::debug!(rows = self.model.n_rows(), cols = self.model.n_cols(), "flipped axes");
    }

    /// Recolor. On error the previous colors, legend and frame stay.
    pub fn set_color(&mut self, color: ColorConfig) -> Result<()> {
        let legend = Legend::build(&self.options, &color, &self.model.stats())?;
        self.model.set_color(color)?;
        self.legend = legend;
        self.invalidate(RedrawFlags::CELLS);
        Ok(())
    }

    pub fn sort(&mut self, axis: Axis, category: usize, direction: SortDirection) -> Result<()> {
        self.model.sort(SortKey { axis, category }, direction)?;
        self.after_data_change();
        Ok(())
    }

    /// Sort button: none/descending -> ascending -> descending.
    pub fn toggle_sort(&mut self, axis: Axis, category: usize) -> Result<SortDirection> {
        let direction = self.model.toggle_sort(SortKey { axis, category })?;
        self.after_data_change();
        Ok(direction)
    }

    pub fn move_item(&mut self, axis: Axis, from: usize, to: usize) -> Result<()> {
        self.model.move_item(axis, from, to)?;
        self.after_data_change();
        Ok(())
    }

    // ---- search ----

    /// Highlight labels containing `query`. Returns the match count.
    pub fn search(&mut self, query: &str) -> usize {
        let n = self.search.set_query(&self.model, query);
        self.engine.set_search(self.search.query());
        self.invalidate(RedrawFlags::ALL);
        n
    }

    /// Scroll the next match into view.
    pub fn next_match(&mut self) -> Option<(Axis, usize)> {
        let (axis, index) = self.search.next_match()?;
        if self.viewport.scroll_into_view(axis, index) {
            self.invalidate(match axis {
                Axis::Row => RedrawFlags::Y,
                Axis::Col => RedrawFlags::X,
            });
        }
        Some((axis, index))
    }

    // ---- pointer ----

    /// Data `(row, col)` of the visible cell under a pixel.
    pub fn cell_at(&self, px: f64, py: f64) -> Option<(usize, usize)> {
        let (x, y) = self.coords().pixel_to_local(px, py)?;
        if x >= self.viewport.x_view || y >= self.viewport.y_view {
            return None;
        }
        let (row, col) = self.coords().local_to_data(x, y);
        (row < self.model.n_rows() && col < self.model.n_cols()).then_some((row, col))
    }

    /// The per-item label under a pixel.
    pub fn label_at(&self, px: f64, py: f64) -> Option<(Axis, usize)> {
        self.engine.frame().label_at(px, py)
    }

    /// Press: starts a selection when inside the grid and no label is being
    /// dragged.
    pub fn pointer_down(&mut self, px: f64, py: f64) -> bool {
        if self.reordering().is_some() {
            return false;
        }
        let local = self
            .cell_at(px, py)
            .and_then(|(row, col)| self.coords().data_to_local(row, col));
        let started = self.selection.pointer_down(local);
        self.decorations_dirty = true;
        started
    }

    /// Move: extends a selection in progress and tracks hover.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> Vec<ChartEvent> {
        let mut events = Vec::new();
        if self.selection.is_dragging() {
            let cs = self.coords();
            if let Some((x, y)) =
                clamp_to_view(&cs, self.viewport.x_view, self.viewport.y_view, px, py)
            {
                if self.selection.pointer_move(x, y) {
                    self.decorations_dirty = true;
                }
            }
        }
        match self.hover.track(self.cell_at(px, py)) {
            HoverChange::Entered(row, col) => {
                if let Some(info) = self.model.hover_info(row, col) {
                    events.push(ChartEvent::Hover(info));
                }
                self.decorations_dirty = true;
            }
            HoverChange::Left => {
                events.push(ChartEvent::HoverEnd);
                self.decorations_dirty = true;
            }
            HoverChange::Unchanged => {}
        }
        events
    }

    /// Release: a zero-extent press is a click, anything else a selection.
    pub fn pointer_up(&mut self) -> Option<ChartEvent> {
        if self.pending.is_some() && self.selection.is_dragging() {
            // Zoom or resize since the last frame: the view may have shrunk.
            self.viewport.compute_view_size(self.engine.layout());
        }
        self.selection.clamp_to(self.viewport.x_view, self.viewport.y_view);
        let cs = self.coords();
        let gesture = self.selection.pointer_up();
        self.decorations_dirty = true;
        match gesture {
            SelectionGesture::None => None,
            SelectionGesture::Click { x, y } => {
                let (row, col) = cs.local_to_data(x, y);
                self.model.cell_entry(row, col).map(ChartEvent::Click)
            }
            SelectionGesture::Select { x1, y1, x2, y2 } => {
                let (r1, c1) = cs.local_to_data(x1, y1);
                let (r2, c2) = cs.local_to_data(x2, y2);
                let entries = self.model.entries(r1..=r2, c1..=c2);
                tracing::debug!(count = entries.len(), "selection");
                Some(ChartEvent::Selection(entries))
            }
        }
    }

    /// The pointer left the tracked region: drop gestures and hover.
    pub fn pointer_leave(&mut self) -> Option<ChartEvent> {
        self.selection.cancel();
        self.decorations_dirty = true;
        match self.hover.track(None) {
            HoverChange::Left => Some(ChartEvent::HoverEnd),
            _ => None,
        }
    }

    /// A plain click on an axis label selects the whole row or column.
    pub fn label_click(&self, axis: Axis, index: usize) -> Option<ChartEvent> {
        let entries = self.model.axis_entries(axis, index);
        (!entries.is_empty()).then_some(ChartEvent::Selection(entries))
    }

    fn drag_mut(&mut self, axis: Axis) -> &mut DragReorder {
        match axis {
            Axis::Row => &mut self.row_drag,
            Axis::Col => &mut self.col_drag,
        }
    }

    /// Axis whose label is being dragged, if any.
    pub fn reordering(&self) -> Option<Axis> {
        [&self.row_drag, &self.col_drag]
            .into_iter()
            .find(|d| d.is_dragging())
            .map(DragReorder::axis)
    }

    /// Label drag start. Refused while a cell selection or another reorder
    /// is in progress.
    pub fn drag_start(&mut self, axis: Axis, index: usize) -> bool {
        if index >= self.model.len(axis)
            || self.selection.is_dragging()
            || self.reordering().is_some()
        {
            return false;
        }
        self.drag_mut(axis).drag_start(index);
        true
    }

    /// Drag over the surface: move the guide to the nearest boundary.
    pub fn drag_over(&mut self, axis: Axis, px: f64, py: f64) -> bool {
        let pos = match axis {
            Axis::Row => py,
            Axis::Col => px,
        };
        // Only boundaries on screen can carry the guide line.
        let visible = self.viewport.visible(axis);
        let boundary = self
            .coords()
            .boundary_at(axis, pos)
            .clamp(visible.start, visible.end);
        let len = self.model.len(axis);
        let moved = self.drag_mut(axis).drag_over(boundary, len);
        if moved {
            self.decorations_dirty = true;
        }
        moved
    }

    /// Drop: move the dragged item. Returns `(from, to)` when it moved.
    pub fn drag_end(&mut self, axis: Axis) -> Result<Option<(usize, usize)>> {
        self.decorations_dirty = true;
        let Some((from, to)) = self.drag_mut(axis).drag_end() else {
            return Ok(None);
        };
        self.move_item(axis, from, to)?;
        Ok(Some((from, to)))
    }

    pub fn drag_cancel(&mut self, axis: Axis) {
        if self.drag_mut(axis).cancel() {
            self.decorations_dirty = true;
        }
    }

    // ---- export ----

    /// SVG of the visible window, or of the whole matrix with `full`.
    pub fn export_svg(&self, full: bool, measure: &mut dyn TextMeasure) -> Result<String> {
        export_svg(
            &self.model,
            &self.viewport,
            self.engine.layout(),
            self.theme(),
            full,
            measure,
        )
    }

    /// What the tree panel needs, when a newick string was configured.
    pub fn tree_request(&self) -> Option<TreeRequest> {
        let newick = self.newick.clone()?;
        let rect = self.engine.layout().tree_rect(self.viewport.height)?;
        Some(TreeRequest {
            newick,
            width: rect.w,
            height: rect.h,
        })
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
    use crate::render::ApproxTextMeasure;
    use crate::types::AxisLabel;

    fn chart(m: usize, n: usize) -> Chart {
        let rows = (0..m).map(|i| AxisLabel::new(format!("r{i}"))).collect();
        let cols = (0..n).map(|j| AxisLabel::new(format!("c{j}"))).collect();
        #[allow(clippy::cast_precision_loss)]
        let matrix = (0..m)
            .map(|i| (0..n).map(|j| (i * n + j) as f64).collect())
            .collect();
        let mut config = ChartConfig::new(rows, cols, matrix);
        config.defaults = CellDefaults {
            cell_width: Some(10.0),
            cell_height: Some(10.0),
        };
        let mut chart = Chart::new(&config, 800.0, 600.0).unwrap();
        chart.render(&mut ApproxTextMeasure::default()).unwrap();
        chart
    }

    fn center(chart: &Chart, row: usize, col: usize) -> (f64, f64) {
        let r = chart.coords().cell_rect(row, col).unwrap();
        (r.x + r.w / 2.0, r.y + r.h / 2.0)
    }

    #[test]
    fn render_presents_once_per_change() {
        let mut c = chart(5, 5);
        let mut m = ApproxTextMeasure::default();
        assert!(!c.needs_render());
        assert!(!c.render(&mut m).unwrap());
        c.zoom(1.0, None);
        assert!(c.render(&mut m).unwrap());
        assert_eq!(c.frame().generation, 2);
    }

    #[test]
    fn click_on_cell_emits_one_entry() {
        let mut c = chart(3, 3);
        let (x, y) = center(&c, 1, 1);
        assert!(c.pointer_down(x, y));
        let event = c.pointer_up().unwrap();
        let ChartEvent::Click(entry) = event else {
            panic!("expected click");
        };
        assert_eq!(entry.value, 4.0);
        assert_eq!((entry.row_label.as_str(), entry.col_label.as_str()), ("r1", "c1"));
    }

    #[test]
    fn drag_selection_emits_row_major_entries() {
        let mut c = chart(4, 4);
        let (x1, y1) = center(&c, 2, 2);
        let (x2, y2) = center(&c, 1, 0);
        c.pointer_down(x1, y1);
        c.pointer_move(x2, y2);
        let Some(ChartEvent::Selection(entries)) = c.pointer_up() else {
            panic!("expected selection");
        };
        let values: Vec<f64> = entries.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![4.0, 5.0, 6.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn hover_is_deduplicated_and_ends_on_leave() {
        let mut c = chart(3, 3);
        let (x, y) = center(&c, 0, 2);
        assert_eq!(c.pointer_move(x, y).len(), 1);
        assert!(c.pointer_move(x + 1.0, y).is_empty());
        assert_eq!(c.pointer_leave(), Some(ChartEvent::HoverEnd));
        c.render(&mut ApproxTextMeasure::default()).unwrap();
        assert!(c.frame().decorations.hover_cell.is_none());
    }

    #[test]
    fn label_drag_moves_row() {
        let mut c = chart(4, 2);
        assert!(c.drag_start(Axis::Row, 0));
        let y = c.coords().item_offset(Axis::Row, 3);
        c.drag_over(Axis::Row, 0.0, y);
        c.render(&mut ApproxTextMeasure::default()).unwrap();
        assert!(c.frame().decorations.drag_guide.is_some());
        assert_eq!(c.drag_end(Axis::Row).unwrap(), Some((0, 2)));
        let names: Vec<_> = c.state().rows.into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["r1", "r2", "r0", "r3"]);
        c.render(&mut ApproxTextMeasure::default()).unwrap();
        assert!(c.frame().decorations.drag_guide.is_none());
    }

    #[test]
    fn pan_only_rebuilds_scrolled_axis() {
        let mut c = chart(200, 200);
        assert!(c.pan(Some(10), None));
        c.render(&mut ApproxTextMeasure::default()).unwrap();
        let stats = c.engine.last_stats();
        assert!(stats.col_labels_rebuilt);
        assert!(!stats.row_labels_rebuilt);
    }

    #[test]
    fn failed_recolor_keeps_state() {
        let mut c = chart(2, 2);
        let before = c.model().resolved_colors().clone();
        assert!(c.set_color(ColorConfig::bins(["bogus"], ["red"])).is_err());
        assert_eq!(c.model().resolved_colors(), &before);
        assert!(!c.needs_render());
    }

    #[test]
    fn update_resets_scroll() {
        let mut c = chart(200, 200);
        c.pan(Some(5), Some(5));
        c.update(DataUpdate {
            rows_label: Some("Genes".into()),
            ..DataUpdate::default()
        })
        .unwrap();
        c.render(&mut ApproxTextMeasure::default()).unwrap();
        assert_eq!((c.viewport().x_start, c.viewport().y_start), (0, 0));
        assert_eq!(c.model().title(Axis::Row), "Genes");
    }

    #[test]
    fn next_match_scrolls_into_view() {
        let mut c = chart(200, 3);
        assert_eq!(c.search("r150"), 1);
        assert_eq!(c.next_match(), Some((Axis::Row, 150)));
        c.render(&mut ApproxTextMeasure::default()).unwrap();
        assert!(c.viewport().visible_rows().contains(&150));
    }

    #[test]
    fn tree_request_needs_newick() {
        let c = chart(2, 2);
        assert!(c.tree_request().is_none());
    }
}
