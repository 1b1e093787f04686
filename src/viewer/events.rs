//! Mouse, wheel, label drag and panel event handlers for `HeatView`.
//!
//! Cell selection runs on the mouse events of the root; row/column reordering
//! runs on the native drag events of the label handles. All methods here are
//! `pub(crate)` helpers called from the listeners that `mod.rs` registers.
//! Chart state is borrowed only while the chart is updated; user callbacks
//! run after the borrow is released so they may call back into the widget.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{DragEvent, Element, MouseEvent, WheelEvent};

#[cfg(target_arch = "wasm32")]
use super::panels::{parse_handle, PanelAction};
#[cfg(target_arch = "wasm32")]
use super::{alert, pointer_pos, to_js, HeatView, SharedState};
#[cfg(target_arch = "wasm32")]
use crate::chart::ChartEvent;
#[cfg(target_arch = "wasm32")]
use crate::interact::default_tooltip_html;
#[cfg(target_arch = "wasm32")]
use crate::types::Axis;

/// Whole cells to pan for a wheel delta; any nonzero delta moves at least one.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn wheel_cells(delta: f64, cell: f64) -> isize {
    if !delta.is_finite() || delta.abs() < f64::EPSILON || cell <= 0.0 {
        return 0;
    }
    let cells = (delta / cell).round() as isize;
    if cells == 0 {
        if delta > 0.0 {
            1
        } else {
            -1
        }
    } else {
        cells
    }
}

#[cfg(target_arch = "wasm32")]
impl HeatView {
    pub(crate) fn internal_mouse_down(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        state.borrow_mut().chart.pointer_down(x, y);
        Self::schedule_render(state);
    }

    pub(crate) fn internal_mouse_move(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        let events = {
            let mut s = state.borrow_mut();
            let _ = s
                .dom
                .root
                .style()
                .set_property("cursor", Self::cursor_for(&s, x, y));
            s.chart.pointer_move(x, y)
        };
        Self::schedule_render(state);
        Self::dispatch(state, events, (x, y));
    }

    fn cursor_for(s: &SharedState, x: f64, y: f64) -> &'static str {
        if s.chart.label_at(x, y).is_some() {
            "grab"
        } else if s.chart.cell_at(x, y).is_some() {
            "crosshair"
        } else {
            "default"
        }
    }

    pub(crate) fn internal_mouse_up(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        let event = state.borrow_mut().chart.pointer_up();
        Self::schedule_render(state);
        Self::dispatch(state, event.into_iter().collect(), (x, y));
    }

    pub(crate) fn internal_mouse_leave(state: &Rc<RefCell<SharedState>>) {
        let event = {
            let mut s = state.borrow_mut();
            let _ = s.dom.root.style().set_property("cursor", "default");
            s.chart.pointer_leave()
        };
        Self::schedule_render(state);
        Self::dispatch(state, event.into_iter().collect(), (0.0, 0.0));
    }

    /// `(axis, index)` of the label handle an event started on.
    fn handle_of(event: &web_sys::Event) -> Option<(Axis, usize)> {
        let handle = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("[data-index]").ok().flatten())?;
        parse_handle(
            handle.get_attribute("data-axis").as_deref(),
            handle.get_attribute("data-index").as_deref(),
        )
    }

    /// Plain click on a label handle selects the whole row or column.
    pub(crate) fn internal_label_click(state: &Rc<RefCell<SharedState>>, event: &MouseEvent) {
        let Some((axis, index)) = Self::handle_of(event) else {
            return;
        };
        event.stop_propagation();
        let (selection, pos) = {
            let s = state.borrow();
            let pos = pointer_pos(event, &s.dom.root, s.use_bounding_client);
            (s.chart.label_click(axis, index), pos)
        };
        Self::dispatch(state, selection.into_iter().collect(), pos);
    }

    pub(crate) fn internal_drag_start(state: &Rc<RefCell<SharedState>>, event: &DragEvent) {
        let Some((axis, index)) = Self::handle_of(event) else {
            return;
        };
        let started = {
            let mut s = state.borrow_mut();
            let started = s.chart.drag_start(axis, index);
            if started {
                s.dom.hide_tooltip();
                if let Some(transfer) = event.data_transfer() {
                    transfer.set_effect_allowed("move");
                    let name = s
                        .chart
                        .model()
                        .label(axis, index)
                        .map(|l| l.name.clone())
                        .unwrap_or_default();
                    // Firefox only starts a drag that carries data.
                    let _ = transfer.set_data("text/plain", &name);
                }
            }
            started
        };
        if started {
            tracing::debug!(axis = axis.name(), index, "reorder started");
        } else {
            event.prevent_default();
        }
    }

    /// Drag over the widget: accept the drop and move the guide line.
    pub(crate) fn internal_drag_over(state: &Rc<RefCell<SharedState>>, event: &DragEvent) {
        {
            let mut s = state.borrow_mut();
            let Some(axis) = s.chart.reordering() else {
                return;
            };
            event.prevent_default();
            if let Some(transfer) = event.data_transfer() {
                transfer.set_drop_effect("move");
            }
            let (x, y) = pointer_pos(event, &s.dom.root, s.use_bounding_client);
            if !s.chart.drag_over(axis, x, y) {
                return;
            }
        }
        Self::schedule_render(state);
    }

    pub(crate) fn internal_drop(state: &Rc<RefCell<SharedState>>, event: &DragEvent) {
        {
            let mut s = state.borrow_mut();
            let Some(axis) = s.chart.reordering() else {
                return;
            };
            event.prevent_default();
            match s.chart.drag_end(axis) {
                Ok(Some((from, to))) => {
                    tracing::debug!(axis = axis.name(), from, to, "reordered");
                    s.panels_dirty = true;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "reorder failed");
                    alert(&e.to_string());
                }
            }
        }
        Self::schedule_render(state);
    }

    /// End of a drag that was not dropped on the widget.
    pub(crate) fn internal_drag_end(state: &Rc<RefCell<SharedState>>) {
        {
            let mut s = state.borrow_mut();
            let Some(axis) = s.chart.reordering() else {
                return;
            };
            s.chart.drag_cancel(axis);
        }
        Self::schedule_render(state);
    }

    /// Ctrl+wheel zooms, plain wheel pans by whole cells.
    pub(crate) fn internal_wheel(state: &Rc<RefCell<SharedState>>, event: &WheelEvent) {
        let consumed = {
            let mut s = state.borrow_mut();
            if event.ctrl_key() || event.meta_key() {
                let delta = if event.delta_y() < 0.0 { 1.0 } else { -1.0 };
                s.chart.zoom(delta, None)
            } else {
                let vp = s.chart.viewport();
                let (dx, dy) = if event.shift_key() {
                    (event.delta_y(), event.delta_x())
                } else {
                    (event.delta_x(), event.delta_y())
                };
                let dx = wheel_cells(dx, vp.cell_w);
                let dy = wheel_cells(dy, vp.cell_h);
                s.chart.pan_by(dx, dy)
            }
        };
        if consumed {
            event.prevent_default();
            Self::schedule_render(state);
        }
    }

    /// Delegated click on a toolbar or menu button.
    pub(crate) fn internal_panel_click(state: &Rc<RefCell<SharedState>>, event: &MouseEvent) {
        let Some(button) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("[data-action]").ok().flatten())
        else {
            return;
        };
        let attr = |name: &str| button.get_attribute(name);
        let Some(action) = attr("data-action").and_then(|a| {
            PanelAction::parse(
                &a,
                attr("data-axis").as_deref(),
                attr("data-cat").as_deref(),
                attr("data-delta").as_deref(),
            )
        }) else {
            return;
        };
        event.stop_propagation();
        Self::apply_panel_action(state, action);
    }

    pub(crate) fn apply_panel_action(state: &Rc<RefCell<SharedState>>, action: PanelAction) {
        let fullscreen = {
            let mut s = state.borrow_mut();
            match action {
                PanelAction::ToggleOptions => s.dom.toggle_menu(),
                PanelAction::Flip => {
                    s.chart.flip_axis();
                    s.panels_dirty = true;
                }
                PanelAction::Lock => {
                    let locked = !s.chart.is_locked();
                    s.chart.set_locked(locked);
                    s.panels_dirty = true;
                }
                PanelAction::Sort(axis, category) => {
                    if let Err(e) = s.chart.toggle_sort(axis, category) {
                        tracing::error!(error = %e, "sort failed");
                        alert(&e.to_string());
                    }
                    s.panels_dirty = true;
                }
                PanelAction::Zoom(axis, delta) => {
                    s.chart.zoom(delta, axis);
                }
                PanelAction::NextMatch => {
                    s.chart.next_match();
                }
                PanelAction::Download => {
                    drop(s);
                    Self::download(state, &crate::render::SvgExportOptions::default());
                    return;
                }
                PanelAction::Fullscreen => {}
            }
            if matches!(action, PanelAction::Fullscreen) {
                s.callbacks.on_fullscreen.clone()
            } else {
                None
            }
        };
        Self::schedule_render(state);
        if let Some(callback) = fullscreen {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                web_sys::console::error_2(&"onFullscreenClick failed".into(), &e);
            }
        }
    }

    pub(crate) fn internal_search_input(state: &Rc<RefCell<SharedState>>) {
        {
            let mut s = state.borrow_mut();
            let query = s.dom.search.value();
            let n = s.chart.search(&query);
            tracing::debug!(query = %query, matches = n, "search");
        }
        Self::schedule_render(state);
    }

    /// Forward chart events to the configured callbacks and the tooltip.
    pub(crate) fn dispatch(
        state: &Rc<RefCell<SharedState>>,
        events: Vec<ChartEvent>,
        (x, y): (f64, f64),
    ) {
        if events.is_empty() {
            return;
        }
        let callbacks = state.borrow().callbacks.clone();
        for event in events {
            match event {
                ChartEvent::Selection(entries) => {
                    if let Some(f) = &callbacks.on_selection {
                        if let Err(e) = f.call1(&JsValue::NULL, &to_js(&entries)) {
                            web_sys::console::error_2(&"onSelection failed".into(), &e);
                        }
                    }
                }
                ChartEvent::Click(entry) => {
                    if let Some(f) = &callbacks.on_click {
                        if let Err(e) = f.call1(&JsValue::NULL, &to_js(&entry)) {
                            web_sys::console::error_2(&"onClick failed".into(), &e);
                        }
                    }
                }
                ChartEvent::Hover(info) => {
                    let html = match &callbacks.on_hover {
                        Some(f) => match f.call1(&JsValue::NULL, &to_js(&info)) {
                            Ok(v) => v.as_string(),
                            Err(e) => {
                                web_sys::console::error_2(&"onHover failed".into(), &e);
                                None
                            }
                        },
                        None => Some(default_tooltip_html(&info)),
                    };
                    let s = state.borrow();
                    match html {
                        Some(html) if !html.is_empty() => s.dom.show_tooltip(&html, x, y),
                        _ => s.dom.hide_tooltip(),
                    }
                }
                ChartEvent::HoverEnd => state.borrow().dom.hide_tooltip(),
            }
        }
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
    use test_case::test_case;

    #[test_case(0.0, 10.0, 0 ; "no motion")]
    #[test_case(3.0, 10.0, 1 ; "small delta still moves")]
    #[test_case(-3.0, 10.0, -1 ; "small negative delta")]
    #[test_case(100.0, 10.0, 10 ; "whole cells")]
    #[test_case(100.0, 0.0, 0 ; "degenerate cell")]
    fn wheel_moves_whole_cells(delta: f64, cell: f64, expected: isize) {
        assert_eq!(wheel_cells(delta, cell), expected);
    }
}
