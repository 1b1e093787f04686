//! Native scroll boxes and resize handling for `HeatView`.
//!
//! Each axis gets a scroll container laid over its track with a spacer sized
//! to the axis content; its offset maps back to a start index. Resizes are
//! debounced with a settle timer.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::layout::ScrollBox;
#[cfg(target_arch = "wasm32")]
use crate::render::RenderBackend;
#[cfg(target_arch = "wasm32")]
use crate::types::Axis;

#[cfg(target_arch = "wasm32")]
use super::{now_ms, HeatView, SharedState};

/// Delay (ms) after the last resize notification before re-laying out.
#[cfg(target_arch = "wasm32")]
const RESIZE_SETTLE_DELAY_MS: i32 = 150;

/// Native pixels per content pixel for a scroller `track` pixels long.
fn track_ratio(sb: &ScrollBox, track: f64) -> f64 {
    if sb.viewport > 0.0 && track > 0.0 {
        track / sb.viewport
    } else {
        1.0
    }
}

/// Spacer length giving the scroller the same proportions as the axis.
pub(crate) fn spacer_length(sb: &ScrollBox, track: f64) -> f64 {
    sb.content * track_ratio(sb, track)
}

/// Scroller offset for the current start index.
pub(crate) fn native_offset(sb: &ScrollBox, track: f64) -> f64 {
    sb.offset * track_ratio(sb, track)
}

/// Start index for a scroller offset.
pub(crate) fn start_for_native(sb: &ScrollBox, track: f64, scroll: f64) -> usize {
    sb.start_for_offset(scroll / track_ratio(sb, track))
}

#[cfg(target_arch = "wasm32")]
fn px(v: f64) -> String {
    format!("{v}px")
}

#[cfg(target_arch = "wasm32")]
impl HeatView {
    /// Place both scrollers over their tracks and match their offsets to the
    /// viewport.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn sync_scrollers(s: &SharedState) {
        let frame = s.chart.frame();
        let vp = s.chart.viewport();
        let bars = [
            (Axis::Col, &frame.col_scrollbar, &s.dom.col_scroll, &s.dom.col_spacer),
            (Axis::Row, &frame.row_scrollbar, &s.dom.row_scroll, &s.dom.row_spacer),
        ];
        for (axis, bar, scroller, spacer) in bars {
            let style = scroller.style();
            if !bar.visible {
                let _ = style.set_property("display", "none");
                continue;
            }
            let _ = style.set_property("display", "block");
            let _ = style.set_property("left", &px(bar.track.x));
            let _ = style.set_property("top", &px(bar.track.y));
            let _ = style.set_property("width", &px(bar.track.w));
            let _ = style.set_property("height", &px(bar.track.h));

            let sb = ScrollBox::from_viewport(vp, axis);
            let spacer_style = spacer.style();
            match axis {
                Axis::Col => {
                    let _ = spacer_style.set_property("width", &px(spacer_length(&sb, bar.track.w)));
                    let target = native_offset(&sb, bar.track.w);
                    if (f64::from(scroller.scroll_left()) - target).abs() >= 1.0 {
                        scroller.set_scroll_left(target.round() as i32);
                    }
                }
                Axis::Row => {
                    let _ = spacer_style.set_property("height", &px(spacer_length(&sb, bar.track.h)));
                    let target = native_offset(&sb, bar.track.h);
                    if (f64::from(scroller.scroll_top()) - target).abs() >= 1.0 {
                        scroller.set_scroll_top(target.round() as i32);
                    }
                }
            }
        }
    }

    /// A scroller moved: pan the matching axis. Programmatic syncs resolve to
    /// the current start and are no-ops.
    pub(crate) fn handle_scroll(state: &Rc<RefCell<SharedState>>, axis: Axis) {
        let moved = {
            let mut s = state.borrow_mut();
            let frame = s.chart.frame();
            let sb = ScrollBox::from_viewport(s.chart.viewport(), axis);
            let start = match axis {
                Axis::Col => start_for_native(
                    &sb,
                    frame.col_scrollbar.track.w,
                    f64::from(s.dom.col_scroll.scroll_left()),
                ),
                Axis::Row => start_for_native(
                    &sb,
                    frame.row_scrollbar.track.h,
                    f64::from(s.dom.row_scroll.scroll_top()),
                ),
            };
            match axis {
                Axis::Col => s.chart.pan(Some(start), None),
                Axis::Row => s.chart.pan(None, Some(start)),
            }
        };
        if moved {
            Self::schedule_render(state);
        }
    }

    pub(crate) fn schedule_resize_settle(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        s.last_resize_ms = now_ms();
        if let Some(timer_id) = s.resize_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.resize_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    HeatView::handle_resize_settle(&state);
                }
            }) as Box<dyn FnMut()>);
            s.resize_closure = Some(closure);
        }
        let Some(callback) = s.resize_closure.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            RESIZE_SETTLE_DELAY_MS,
        ) {
            Ok(id) => s.resize_timer = Some(id),
            Err(_) => s.resize_timer = None,
        }
    }

    pub(crate) fn handle_resize_settle(state: &Rc<RefCell<SharedState>>) {
        {
            let mut s = state.borrow_mut();
            s.resize_timer = None;
            let elapsed = now_ms() - s.last_resize_ms;
            if elapsed < f64::from(RESIZE_SETTLE_DELAY_MS) {
                drop(s);
                Self::schedule_resize_settle(state);
                return;
            }
            Self::apply_host_size(&mut s);
        }
        Self::schedule_render(state);
    }

    /// Size the canvas and the chart to the host element.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub(crate) fn apply_host_size(s: &mut SharedState) {
        let width = f64::from(s.dom.host.client_width().max(1));
        let height = f64::from(s.dom.host.client_height().max(1));
        let dpr = s.dpr;
        let (phys_w, phys_h) = ((width * dpr).round() as u32, (height * dpr).round() as u32);
        if phys_w == s.renderer.width()
            && phys_h == s.renderer.height()
            && s.chart.viewport().width.to_bits() == width.to_bits()
            && s.chart.viewport().height.to_bits() == height.to_bits()
        {
            return;
        }
        s.renderer.resize(phys_w, phys_h, dpr as f32);
        s.renderer.set_canvas_css_size(width, height);
        s.chart.resize(width, height);
        tracing::debug!(width, height, dpr, "surface resized");
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
    use crate::layout::Viewport;
    use crate::types::Axis;

    fn scrolled() -> ScrollBox {
        let mut vp = Viewport::new(400.0, 400.0);
        vp.set_shape(100, 100);
        vp.cell_w = 10.0;
        vp.cell_h = 10.0;
        vp.x_view = 20;
        vp.y_view = 20;
        vp.pan(Some(30), None);
        ScrollBox::from_viewport(&vp, Axis::Col)
    }

    #[test]
    fn scroller_matches_axis_when_track_equals_view() {
        let sb = scrolled();
        assert_eq!(spacer_length(&sb, 200.0), 1000.0);
        assert_eq!(native_offset(&sb, 200.0), 300.0);
        assert_eq!(start_for_native(&sb, 200.0, 300.0), 30);
    }

    #[test]
    fn shorter_track_scales_offsets() {
        let sb = scrolled();
        assert_eq!(spacer_length(&sb, 100.0), 500.0);
        assert_eq!(native_offset(&sb, 100.0), 150.0);
        assert_eq!(start_for_native(&sb, 100.0, 150.0), 30);
        assert_eq!(start_for_native(&sb, 100.0, 152.0), 30);
    }
}
