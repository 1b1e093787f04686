//! `HeatView`: the browser widget.
//!
//! This module provides the WASM-exported `HeatView` struct that handles:
//! - Reading the config object (data, options, DOM element, callbacks)
//! - Building the DOM: canvas, scroll boxes, toolbar, legend, tooltip
//! - Wiring mouse, label drag, wheel, scroll and resize events into the `Chart`
//! - Scheduling one canvas paint per animation frame
//!
//! Construction is fail-soft: invalid input is reported with an alert and
//! the widget stays detached instead of throwing.

mod download;
mod events;
mod panels;
mod scroll;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use js_sys::{Function, Reflect};
#[cfg(target_arch = "wasm32")]
use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    AddEventListenerOptions, CustomEvent, CustomEventInit, DragEvent, HtmlElement, KeyboardEvent,
    MouseEvent, ResizeObserver, WheelEvent,
};

use crate::chart::Chart;
#[cfg(target_arch = "wasm32")]
use crate::chart::TreeRequest;
use crate::error::Result;
#[cfg(target_arch = "wasm32")]
use crate::error::HeatviewError;
#[cfg(target_arch = "wasm32")]
use crate::render::{
    CachedMeasure, CanvasRenderer, CanvasTextMeasure, RenderBackend, SvgExportOptions,
};
use crate::sort::SortDirection;
use crate::types::Axis;
#[cfg(target_arch = "wasm32")]
use crate::types::{ChartConfig, ColorConfig, DataUpdate};

#[cfg(target_arch = "wasm32")]
use self::panels::{Dom, PanelAction};

/// Name of the DOM event announcing the tree panel.
pub const TREE_EVENT: &str = "heatview:tree";

/// Parse `sort(axis, category, direction)` arguments.
pub(crate) fn parse_sort(axis: &str, direction: &str) -> Option<(Axis, SortDirection)> {
    let axis = match axis {
        "row" | "rows" => Axis::Row,
        "col" | "cols" | "column" | "columns" => Axis::Col,
        _ => return None,
    };
    let direction = match direction {
        "asc" | "ascending" => SortDirection::Ascending,
        "desc" | "descending" => SortDirection::Descending,
        "none" | "" => SortDirection::None,
        _ => return None,
    };
    Some((axis, direction))
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// Report a user-facing failure.
#[cfg(target_arch = "wasm32")]
pub(crate) fn alert(message: &str) {
    tracing::error!(message, "heatview error");
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Serialize for a JS callback. Maps become plain objects.
#[cfg(target_arch = "wasm32")]
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// User callbacks read off the config object.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Default)]
pub(crate) struct Callbacks {
    pub(crate) on_hover: Option<Function>,
    pub(crate) on_selection: Option<Function>,
    pub(crate) on_click: Option<Function>,
    pub(crate) on_fullscreen: Option<Function>,
}

#[cfg(target_arch = "wasm32")]
impl Callbacks {
    fn from_config(config: &JsValue) -> Self {
        let get = |name: &str| {
            Reflect::get(config, &JsValue::from_str(name))
                .ok()
                .and_then(|v| v.dyn_into::<Function>().ok())
        };
        Self {
            on_hover: get("onHover"),
            on_selection: get("onSelection"),
            on_click: get("onClick"),
            on_fullscreen: get("onFullscreenClick"),
        }
    }
}

/// Shared state that can be accessed by event handlers (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) chart: Chart,
    pub(crate) renderer: CanvasRenderer,
    pub(crate) measure: CachedMeasure<CanvasTextMeasure>,
    pub(crate) dom: Dom,
    pub(crate) callbacks: Callbacks,
    pub(crate) dpr: f64,
    pub(crate) use_bounding_client: bool,
    /// False until `document.fonts.ready` resolves when `waitForFont` is set.
    pub(crate) font_ready: bool,
    /// Sort buttons, lock label or legend need a refresh.
    pub(crate) panels_dirty: bool,
    pub(crate) tree_sent: bool,
    /// Frame generation the label drag handles were placed for.
    pub(crate) handles_generation: Option<u64>,
    pub(crate) raf_pending: bool,
    pub(crate) raf_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) resize_timer: Option<i32>,
    pub(crate) resize_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) last_resize_ms: f64,
}

/// Everything kept alive while the widget is attached.
#[cfg(target_arch = "wasm32")]
struct Mounted {
    state: Rc<RefCell<SharedState>>,
    #[allow(dead_code)]
    mouse_closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    wheel_closure: Closure<dyn FnMut(WheelEvent)>,
    #[allow(dead_code)]
    drag_closures: Vec<Closure<dyn FnMut(DragEvent)>>,
    #[allow(dead_code)]
    event_closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
    #[allow(dead_code)]
    key_closure: Closure<dyn FnMut(KeyboardEvent)>,
    observer: Option<ResizeObserver>,
    #[allow(dead_code)]
    observer_closure: Closure<dyn FnMut()>,
}

/// The main widget struct exported to JavaScript
#[wasm_bindgen]
pub struct HeatView {
    #[cfg(target_arch = "wasm32")]
    mounted: Option<Mounted>,

    // Non-wasm32 fields
    #[cfg(not(target_arch = "wasm32"))]
    chart: Chart,
    #[cfg(not(target_arch = "wasm32"))]
    backend: crate::render::SvgBackend,
    #[cfg(not(target_arch = "wasm32"))]
    measure: crate::render::ApproxTextMeasure,
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

/// Pointer position relative to the widget root.
#[cfg(target_arch = "wasm32")]
fn pointer_pos(event: &MouseEvent, root: &HtmlElement, use_bounding: bool) -> (f64, f64) {
    let on_root = event.target().is_some_and(|t| {
        let t: &JsValue = &t;
        let root: &JsValue = root;
        t == root
    });
    if !use_bounding && on_root {
        return (f64::from(event.offset_x()), f64::from(event.offset_y()));
    }
    let rect = root.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

/// Events inside the toolbar, menu or scroll boxes are not chart gestures.
#[cfg(target_arch = "wasm32")]
fn from_chrome(event: &MouseEvent) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| {
            el.closest(".hv-toolbar, .hv-options, .hv-scroll-x, .hv-scroll-y, .hv-labels")
                .ok()
                .flatten()
        })
        .is_some()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl HeatView {
    /// Create the widget from a config object `{ element, rows, cols, matrix, ... }`.
    ///
    /// Invalid configs raise an alert and leave nothing attached; the
    /// returned instance is then inert (`isMounted()` is false).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> HeatView {
        console_error_panic_hook::set_once();
        match Self::mount(&config) {
            Ok(mounted) => HeatView {
                mounted: Some(mounted),
            },
            Err(e) => {
                alert(&e.to_string());
                HeatView { mounted: None }
            }
        }
    }

    #[wasm_bindgen(js_name = "isMounted")]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Replace data wholesale. Scroll resets to the origin.
    pub fn update(&self, data: JsValue) {
        let Some(state) = self.state() else {
            return;
        };
        let result = serde_wasm_bindgen::from_value::<DataUpdate>(data)
            .map_err(|e| HeatviewError::Config(e.to_string()))
            .and_then(|update| {
                let mut s = state.borrow_mut();
                s.chart.update(update)?;
                s.panels_dirty = true;
                for warning in s.chart.warnings() {
                    web_sys::console::warn_1(&JsValue::from_str(warning));
                }
                Ok(())
            });
        if let Err(e) = result {
            alert(&e.to_string());
        }
        Self::schedule_render(state);
    }

    /// `{ rows, cols, matrix }` in the current order.
    #[wasm_bindgen(js_name = "getState")]
    pub fn get_state(&self) -> JsValue {
        self.state()
            .map_or(JsValue::NULL, |state| to_js(&state.borrow().chart.state()))
    }

    #[wasm_bindgen(js_name = "getViewport")]
    pub fn get_viewport(&self) -> JsValue {
        self.state().map_or(JsValue::NULL, |state| {
            to_js(&state.borrow().chart.viewport_state())
        })
    }

    #[wasm_bindgen(js_name = "flipAxis")]
    pub fn flip_axis(&self) {
        if let Some(state) = self.state() {
            Self::apply_panel_action(state, PanelAction::Flip);
        }
    }

    /// Download an SVG of the visible window (or the full matrix with
    /// `{ full: true }`).
    #[wasm_bindgen(js_name = "downloadSVG")]
    pub fn download_svg(&self, options: JsValue) {
        let Some(state) = self.state() else {
            return;
        };
        let options = if options.is_undefined() || options.is_null() {
            Ok(SvgExportOptions::default())
        } else {
            serde_wasm_bindgen::from_value::<SvgExportOptions>(options)
        };
        match options {
            Ok(options) => Self::download(state, &options),
            Err(e) => alert(&e.to_string()),
        }
    }

    /// Recolor. On failure the previous colors stay on screen.
    #[wasm_bindgen(js_name = "setColor")]
    pub fn set_color(&self, color: JsValue) {
        let Some(state) = self.state() else {
            return;
        };
        let result = serde_wasm_bindgen::from_value::<ColorConfig>(color)
            .map_err(|e| HeatviewError::Config(e.to_string()))
            .and_then(|color| {
                let mut s = state.borrow_mut();
                s.chart.set_color(color)?;
                s.panels_dirty = true;
                Ok(())
            });
        if let Err(e) = result {
            alert(&e.to_string());
        }
        Self::schedule_render(state);
    }

    /// Highlight labels containing `query`; returns the number of matches.
    pub fn search(&self, query: &str) -> usize {
        let Some(state) = self.state() else {
            return 0;
        };
        let n = {
            let mut s = state.borrow_mut();
            s.dom.search.set_value(query);
            s.chart.search(query)
        };
        Self::schedule_render(state);
        n
    }

    #[wasm_bindgen(js_name = "nextMatch")]
    pub fn next_match(&self) {
        if let Some(state) = self.state() {
            Self::apply_panel_action(state, PanelAction::NextMatch);
        }
    }

    /// Zoom by `delta` steps on `"row"`, `"col"`, or both axes.
    pub fn zoom(&self, delta: f64, axis: Option<String>) {
        let axis = match axis.as_deref() {
            Some("row") => Some(Axis::Row),
            Some("col") => Some(Axis::Col),
            _ => None,
        };
        if let Some(state) = self.state() {
            Self::apply_panel_action(state, PanelAction::Zoom(axis, delta));
        }
    }

    #[wasm_bindgen(js_name = "setLocked")]
    pub fn set_locked(&self, locked: bool) {
        let Some(state) = self.state() else {
            return;
        };
        {
            let mut s = state.borrow_mut();
            s.chart.set_locked(locked);
            s.panels_dirty = true;
        }
        Self::schedule_render(state);
    }

    /// Sort by metadata label `category` of `axis` (`"asc"`, `"desc"`, `"none"`).
    pub fn sort(&self, axis: &str, category: usize, direction: &str) {
        let Some(state) = self.state() else {
            return;
        };
        let Some((axis, direction)) = parse_sort(axis, direction) else {
            alert(&format!("invalid sort: {axis} {direction}"));
            return;
        };
        let result = {
            let mut s = state.borrow_mut();
            s.panels_dirty = true;
            s.chart.sort(axis, category, direction)
        };
        if let Err(e) = result {
            alert(&e.to_string());
        }
        Self::schedule_render(state);
    }

    /// Detach from the DOM and stop observing the host.
    pub fn destroy(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            if let Some(observer) = &mounted.observer {
                observer.disconnect();
            }
            mounted.state.borrow().dom.detach();
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl HeatView {
    fn state(&self) -> Option<&Rc<RefCell<SharedState>>> {
        self.mounted.as_ref().map(|m| &m.state)
    }

    fn mount(config: &JsValue) -> Result<Mounted> {
        let element = Reflect::get(config, &JsValue::from_str("element"))
            .ok()
            .and_then(|v| v.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| HeatviewError::Config("`element` must be a DOM element".to_string()))?;
        let chart_config: ChartConfig = serde_wasm_bindgen::from_value(config.clone())
            .map_err(|e| HeatviewError::Config(e.to_string()))?;
        let callbacks = Callbacks::from_config(config);

        let width = f64::from(element.client_width().max(1));
        let height = f64::from(element.client_height().max(1));
        let chart = Chart::new(&chart_config, width, height)?;
        for warning in chart.warnings() {
            web_sys::console::warn_1(&JsValue::from_str(warning));
        }

        let dom = Dom::build(element, &chart, callbacks.on_fullscreen.is_some())?;
        let renderer = match CanvasRenderer::new(dom.canvas.clone()) {
            Ok(renderer) => renderer,
            Err(e) => {
                dom.detach();
                return Err(e);
            }
        };
        let measure = CachedMeasure::new(CanvasTextMeasure::new(renderer.context()));
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let wait_for_font = chart.options().wait_for_font;
        let use_bounding_client = chart.options().use_bounding_client;

        let state = Rc::new(RefCell::new(SharedState {
            chart,
            renderer,
            measure,
            dom,
            callbacks,
            dpr,
            use_bounding_client,
            font_ready: !wait_for_font,
            panels_dirty: false,
            tree_sent: false,
            handles_generation: None,
            raf_pending: false,
            raf_closure: None,
            resize_timer: None,
            resize_closure: None,
            last_resize_ms: 0.0,
        }));
        Self::apply_host_size(&mut state.borrow_mut());

        let mounted = Self::wire(state)?;
        if wait_for_font {
            Self::wait_for_font(&mounted.state);
        }
        Self::schedule_render(&mounted.state);
        tracing::debug!(width, height, dpr, "mounted");
        Ok(mounted)
    }

    fn wire(state: Rc<RefCell<SharedState>>) -> Result<Mounted> {
        let (root, labels, toolbar, menu, col_scroll, row_scroll, search, host) = {
            let s = state.borrow();
            (
                s.dom.root.clone(),
                s.dom.labels.clone(),
                s.dom.toolbar.clone(),
                s.dom.menu.clone(),
                s.dom.col_scroll.clone(),
                s.dom.row_scroll.clone(),
                s.dom.search.clone(),
                s.dom.host.clone(),
            )
        };
        let mut mouse_closures: Vec<Closure<dyn FnMut(MouseEvent)>> = Vec::new();

        // Chart gestures on the root; chrome elements are skipped.
        type Handler = fn(&Rc<RefCell<SharedState>>, f64, f64);
        let gestures: [(&str, Handler); 3] = [
            ("mousedown", Self::internal_mouse_down),
            ("mousemove", Self::internal_mouse_move),
            ("mouseup", Self::internal_mouse_up),
        ];
        for (name, handler) in gestures {
            let state = Rc::clone(&state);
            let root_ref = root.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                if name == "mousedown" && from_chrome(&event) {
                    return;
                }
                let use_bounding = state.borrow().use_bounding_client;
                let (x, y) = pointer_pos(&event, &root_ref, use_bounding);
                handler(&state, x, y);
            }) as Box<dyn FnMut(MouseEvent)>);
            root.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add mouse listener")?;
            mouse_closures.push(closure);
        }

        // Mouse leave cancels gestures and hides the tooltip
        {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                Self::internal_mouse_leave(&state);
            }) as Box<dyn FnMut(MouseEvent)>);
            root.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add mouse listener")?;
            mouse_closures.push(closure);
        }

        // Label handles: plain clicks select, native drags reorder
        {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                Self::internal_label_click(&state, &event);
            }) as Box<dyn FnMut(MouseEvent)>);
            labels
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add click listener")?;
            mouse_closures.push(closure);
        }
        let mut drag_closures: Vec<Closure<dyn FnMut(DragEvent)>> = Vec::new();
        type DragHandler = fn(&Rc<RefCell<SharedState>>, &DragEvent);
        let drags: [(&HtmlElement, &str, DragHandler); 4] = [
            (&labels, "dragstart", Self::internal_drag_start),
            (&labels, "dragend", |state, _| Self::internal_drag_end(state)),
            (&root, "dragover", Self::internal_drag_over),
            (&root, "drop", Self::internal_drop),
        ];
        for (target, name, handler) in drags {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |event: DragEvent| {
                handler(&state, &event);
            }) as Box<dyn FnMut(DragEvent)>);
            target
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add drag listener")?;
            drag_closures.push(closure);
        }

        // Delegated button clicks
        for panel in [&toolbar, &menu] {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                Self::internal_panel_click(&state, &event);
            }) as Box<dyn FnMut(MouseEvent)>);
            panel
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add click listener")?;
            mouse_closures.push(closure);
        }

        // Wheel needs a non-passive listener to suppress page scroll
        let wheel_closure = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |event: WheelEvent| {
                Self::internal_wheel(&state, &event);
            }) as Box<dyn FnMut(WheelEvent)>)
        };
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        root.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            wheel_closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|_| "Failed to add wheel listener")?;

        let mut event_closures: Vec<Closure<dyn FnMut(web_sys::Event)>> = Vec::new();
        for (scroller, axis) in [(&col_scroll, Axis::Col), (&row_scroll, Axis::Row)] {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                Self::handle_scroll(&state, axis);
            }) as Box<dyn FnMut(web_sys::Event)>);
            scroller
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add scroll listener")?;
            event_closures.push(closure);
        }
        {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                Self::internal_search_input(&state);
            }) as Box<dyn FnMut(web_sys::Event)>);
            search
                .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
                .map_err(|_| "Failed to add input listener")?;
            event_closures.push(closure);
        }

        // Enter in the search box jumps to the next match
        let key_closure = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    event.prevent_default();
                    Self::apply_panel_action(&state, PanelAction::NextMatch);
                }
            }) as Box<dyn FnMut(KeyboardEvent)>)
        };
        search
            .add_event_listener_with_callback("keydown", key_closure.as_ref().unchecked_ref())
            .map_err(|_| "Failed to add key listener")?;

        // Host resizes are debounced
        let observer_closure = {
            let weak_state = Rc::downgrade(&state);
            Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    Self::schedule_resize_settle(&state);
                }
            }) as Box<dyn FnMut()>)
        };
        let observer = ResizeObserver::new(observer_closure.as_ref().unchecked_ref()).ok();
        if let Some(observer) = &observer {
            observer.observe(&host);
        }

        Ok(Mounted {
            state,
            mouse_closures,
            wheel_closure,
            drag_closures,
            event_closures,
            key_closure,
            observer,
            observer_closure,
        })
    }

    fn wait_for_font(state: &Rc<RefCell<SharedState>>) {
        let ready = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.fonts().ready().ok());
        let weak_state = Rc::downgrade(state);
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(promise) = ready {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    web_sys::console::warn_2(&"font wait failed".into(), &e);
                }
            }
            if let Some(state) = weak_state.upgrade() {
                {
                    let mut s = state.borrow_mut();
                    s.font_ready = true;
                    s.measure.clear();
                    s.measure.inner_mut().reset();
                    s.chart.refresh();
                }
                HeatView::schedule_render(&state);
            }
        });
    }

    /// Request a paint on the next animation frame if anything changed.
    pub(crate) fn schedule_render(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.raf_pending || !(s.chart.needs_render() || s.panels_dirty) {
            return;
        }
        if s.raf_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    HeatView::render_now(&state);
                }
            }) as Box<dyn FnMut()>);
            s.raf_closure = Some(closure);
        }
        let Some(callback) = s.raf_closure.as_ref() else {
            return;
        };
        if window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .is_ok()
        {
            s.raf_pending = true;
        }
    }

    fn render_now(state: &Rc<RefCell<SharedState>>) {
        let tree = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.raf_pending = false;
            if !s.font_ready {
                return;
            }
            match s.chart.render(&mut s.measure) {
                Ok(true) => {
                    if let Err(e) = s.renderer.present(s.chart.frame()) {
                        tracing::error!(error = %e, "present failed");
                    }
                }
                Ok(false) => {}
                Err(e) => alert(&e.to_string()),
            }
            Self::sync_scrollers(s);
            let generation = s.chart.frame().generation;
            if s.handles_generation != Some(generation) && s.chart.reordering().is_none() {
                s.dom.sync_label_handles(s.chart.frame());
                s.handles_generation = Some(generation);
            }
            if s.panels_dirty {
                s.dom.refresh_panels(&s.chart);
                s.panels_dirty = false;
            }
            if s.tree_sent {
                None
            } else {
                s.tree_sent = true;
                s.chart.tree_request().map(|req| (req, s.dom.host.clone()))
            }
        };
        if let Some((req, host)) = tree {
            Self::dispatch_tree(&host, &req);
        }
    }

    /// One-shot `heatview:tree` event for an external tree panel.
    fn dispatch_tree(host: &HtmlElement, req: &TreeRequest) {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_detail(&to_js(req));
        match CustomEvent::new_with_event_init_dict(TREE_EVENT, &init) {
            Ok(event) => {
                let _ = host.dispatch_event(&event);
            }
            Err(e) => web_sys::console::warn_2(&"tree event failed".into(), &e),
        }
    }
}

// ============================================================================
// Non-WASM32 Implementation (for testing/CLI)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl HeatView {
    /// Create a widget without a DOM, presenting into an SVG backend.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new_test(config_json: &str, width: f64, height: f64) -> Result<Self> {
        use crate::render::RenderBackend;

        let config = crate::types::ChartConfig::from_json(config_json)?;
        let chart = Chart::new(&config, width, height)?;
        let mut backend = crate::render::SvgBackend::new();
        backend.resize(width.max(1.0) as u32, height.max(1.0) as u32, 1.0);
        Ok(HeatView {
            chart,
            backend,
            measure: crate::render::ApproxTextMeasure::default(),
        })
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    /// Render and present if anything changed.
    pub fn render(&mut self) -> Result<bool> {
        use crate::render::RenderBackend;

        if !self.chart.render(&mut self.measure)? {
            return Ok(false);
        }
        self.backend.present(self.chart.frame())?;
        Ok(true)
    }

    /// Number of frames presented so far.
    pub fn presents(&self) -> u64 {
        self.backend.presents()
    }

    pub fn last_svg(&self) -> Option<&str> {
        self.backend.last_svg()
    }

    pub fn update(&mut self, data: crate::types::DataUpdate) -> Result<()> {
        self.chart.update(data)
    }

    pub fn get_state(&self) -> crate::types::ChartState {
        self.chart.state()
    }

    pub fn flip_axis(&mut self) {
        self.chart.flip_axis();
    }

    pub fn set_color(&mut self, color: crate::types::ColorConfig) -> Result<()> {
        self.chart.set_color(color)
    }

    pub fn sort(&mut self, axis: &str, category: usize, direction: &str) -> Result<()> {
        let (axis, direction) = parse_sort(axis, direction).ok_or_else(|| {
            crate::error::HeatviewError::Config(format!("invalid sort: {axis} {direction}"))
        })?;
        self.chart.sort(axis, category, direction)
    }

    /// `(file name, data URL)` of the export `downloadSVG` would trigger.
    pub fn download_svg(
        &mut self,
        options: &crate::render::SvgExportOptions,
    ) -> Result<(String, String)> {
        let svg = self.chart.export_svg(options.full, &mut self.measure)?;
        Ok((options.file_name(), crate::render::svg_data_url(&svg)))
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

    #[test_case("row", "asc", Some((Axis::Row, SortDirection::Ascending)) ; "row ascending")]
    #[test_case("columns", "descending", Some((Axis::Col, SortDirection::Descending)) ; "columns descending")]
    #[test_case("col", "none", Some((Axis::Col, SortDirection::None)) ; "clear")]
    #[test_case("diag", "asc", None ; "bad axis")]
    #[test_case("row", "up", None ; "bad direction")]
    fn parses_sort_arguments(axis: &str, direction: &str, expected: Option<(Axis, SortDirection)>) {
        assert_eq!(parse_sort(axis, direction), expected);
    }

    #[cfg(not(target_arch = "wasm32"))]
    const CONFIG: &str = r#"{
        "rows": [{"name": "r0"}, {"name": "r1"}],
        "cols": [{"name": "c0"}, {"name": "c1"}, {"name": "c2"}],
        "matrix": [[1, 2, 3], [4, 5, 6]]
    }"#;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn presents_once_per_change() {
        let mut view = HeatView::new_test(CONFIG, 600.0, 400.0).unwrap();
        assert!(view.render().unwrap());
        assert!(!view.render().unwrap());
        assert_eq!(view.presents(), 1);
        assert!(view.last_svg().unwrap().contains("<svg"));

        view.flip_axis();
        assert!(view.render().unwrap());
        assert_eq!(view.presents(), 2);
        assert_eq!(view.get_state().rows.len(), 3);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn download_uses_file_name_and_data_url() {
        let mut view = HeatView::new_test(CONFIG, 600.0, 400.0).unwrap();
        view.render().unwrap();
        let options = crate::render::SvgExportOptions {
            file_name: Some("genes".to_string()),
            full: true,
        };
        let (name, url) = view.download_svg(&options).unwrap();
        assert_eq!(name, "genes.svg");
        assert!(url.starts_with("data:image/svg+xml;base64,"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn invalid_config_is_rejected() {
        let bad = r#"{"rows": [{"name": "r0"}], "cols": [{"name": "c0"}], "matrix": [[1, 2]]}"#;
        assert!(HeatView::new_test(bad, 100.0, 100.0).is_err());
    }
}
