//! Peripheral controls: toolbar, options menu, scale control, legend, footer,
//! and the draggable label handles.
//!
//! Markup is generated as strings and wired through a single delegated click
//! listener; each button carries `data-action` (plus `data-axis`/`data-cat`
//! or `data-delta`).

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlInputElement};

use crate::chart::Chart;
#[cfg(target_arch = "wasm32")]
use crate::error::Result;
use crate::render::{escape_html, Frame, ThemeColors};
use crate::sort::{SortDirection, SortKey};
use crate::types::{Axis, ChartOptions};

/// Default text of the options toggle.
pub(crate) const DEFAULT_OPTIONS_LABEL: &str = "Options";

/// What a toolbar or menu button asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PanelAction {
    ToggleOptions,
    Flip,
    Lock,
    Sort(Axis, usize),
    Zoom(Option<Axis>, f64),
    NextMatch,
    Download,
    Fullscreen,
}

fn parse_axis(s: &str) -> Option<Axis> {
    match s {
        "row" => Some(Axis::Row),
        "col" => Some(Axis::Col),
        _ => None,
    }
}

fn axis_attr(axis: Axis) -> &'static str {
    match axis {
        Axis::Row => "row",
        Axis::Col => "col",
    }
}

impl PanelAction {
    /// Decode a button's data attributes.
    pub(crate) fn parse(
        action: &str,
        axis: Option<&str>,
        cat: Option<&str>,
        delta: Option<&str>,
    ) -> Option<Self> {
        Some(match action {
            "options" => Self::ToggleOptions,
            "flip" => Self::Flip,
            "lock" => Self::Lock,
            "sort" => Self::Sort(parse_axis(axis?)?, cat?.parse().ok()?),
            "zoom" => Self::Zoom(axis.and_then(parse_axis), delta?.parse().ok()?),
            "next" => Self::NextMatch,
            "download" => Self::Download,
            "fullscreen" => Self::Fullscreen,
            _ => return None,
        })
    }
}

fn button(action: &str, attrs: &str, title: &str, text: &str) -> String {
    format!(
        r#"<button type="button" class="hv-btn" data-action="{action}"{attrs} title="{}">{}</button>"#,
        escape_html(title),
        escape_html(text)
    )
}

/// Top-right strip: options toggle, scale control, optional fullscreen.
pub(crate) fn toolbar_html(options: &ChartOptions, fullscreen: bool) -> String {
    let mut html = String::new();
    if !options.hide_options {
        let label = options
            .options_label
            .as_deref()
            .unwrap_or(DEFAULT_OPTIONS_LABEL);
        html.push_str(&button("options", "", label, label));
    }
    for (axis, name) in [(None, ""), (Some(Axis::Col), " x"), (Some(Axis::Row), " y")] {
        let attr = axis.map_or_else(String::new, |a| {
            format!(r#" data-axis="{}""#, axis_attr(a))
        });
        html.push_str(&button(
            "zoom",
            &format!(r#"{attr} data-delta="-1""#),
            &format!("zoom out{name}"),
            &format!("-{name}"),
        ));
        html.push_str(&button(
            "zoom",
            &format!(r#"{attr} data-delta="1""#),
            &format!("zoom in{name}"),
            &format!("+{name}"),
        ));
    }
    if fullscreen {
        html.push_str(&button("fullscreen", "", "fullscreen", "\u{26f6}"));
    }
    html
}

/// Fixed part of the options menu. The search input is created separately so
/// it survives rebuilds of the sort list.
pub(crate) fn menu_html(locked: bool) -> String {
    let lock = if locked { "Unlock aspect" } else { "Lock aspect" };
    [
        button("next", "", "next match", "Next match"),
        button("flip", "", "swap rows and columns", "Flip axes"),
        button("lock", "", "keep cells square", lock),
        button("download", "", "download as SVG", "Download SVG"),
    ]
    .concat()
}

fn arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::None => "",
        SortDirection::Ascending => " \u{25b2}",
        SortDirection::Descending => " \u{25bc}",
    }
}

/// One sort button per visible metadata label, showing the active direction.
pub(crate) fn sort_list_html(chart: &Chart) -> String {
    let model = chart.model();
    let mut html = String::new();
    for axis in [Axis::Row, Axis::Col] {
        if !model.shows_categories(axis) {
            continue;
        }
        for (k, label) in model.meta_labels(axis).iter().enumerate() {
            let direction = model.sort_model().direction(SortKey { axis, category: k });
            let text = format!("Sort {}s by {label}{}", axis.name(), arrow(direction));
            html.push_str(&button(
                "sort",
                &format!(r#" data-axis="{}" data-cat="{k}""#, axis_attr(axis)),
                &text,
                &text,
            ));
        }
    }
    html
}

/// Transparent draggable boxes over each per-item label. Reordering runs on
/// the native drag events of these boxes, apart from the canvas mouse events
/// that drive cell selection.
pub(crate) fn label_handles_html(frame: &Frame) -> String {
    let mut html = String::new();
    for axis in [Axis::Row, Axis::Col] {
        for label in frame.labels(axis) {
            let Some(index) = label.index else {
                continue;
            };
            let r = label.hit;
            html.push_str(&format!(
                r#"<div class="hv-label" draggable="true" data-axis="{}" data-index="{index}" style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;cursor:grab;pointer-events:auto;"></div>"#,
                axis_attr(axis),
                r.x,
                r.y,
                r.w,
                r.h
            ));
        }
    }
    html
}

/// Decode a label handle's `data-axis`/`data-index`.
pub(crate) fn parse_handle(axis: Option<&str>, index: Option<&str>) -> Option<(Axis, usize)> {
    Some((parse_axis(axis?)?, index?.parse().ok()?))
}

pub(crate) fn footer_text() -> String {
    format!("heatview v{}", crate::version())
}

/// Inline style shared by the floating panels.
pub(crate) fn panel_style(colors: &ThemeColors) -> String {
    format!(
        "position:absolute;z-index:3;font:12px sans-serif;color:{};background:{};",
        colors.text, colors.background
    )
}

/// Handles to every element the viewer owns. `root` is the only node inserted
/// into the host; removing it detaches everything.
#[cfg(target_arch = "wasm32")]
pub(crate) struct Dom {
    pub(crate) host: HtmlElement,
    pub(crate) root: HtmlElement,
    pub(crate) canvas: HtmlCanvasElement,
    pub(crate) col_scroll: HtmlElement,
    pub(crate) col_spacer: HtmlElement,
    pub(crate) row_scroll: HtmlElement,
    pub(crate) row_spacer: HtmlElement,
    pub(crate) tooltip: HtmlElement,
    /// Layer holding the label drag handles.
    pub(crate) labels: HtmlElement,
    pub(crate) legend: HtmlElement,
    pub(crate) toolbar: HtmlElement,
    pub(crate) menu: HtmlElement,
    pub(crate) menu_fixed: HtmlElement,
    pub(crate) sort_list: HtmlElement,
    pub(crate) search: HtmlInputElement,
}

#[cfg(target_arch = "wasm32")]
fn create(document: &Document, tag: &str, class: &str) -> Result<HtmlElement> {
    let el = document
        .create_element(tag)
        .map_err(|_| "Failed to create element")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "Element is not an HtmlElement")?;
    el.set_class_name(class);
    Ok(el)
}

#[cfg(target_arch = "wasm32")]
fn set_styles(el: &HtmlElement, styles: &[(&str, &str)]) {
    let style = el.style();
    for (k, v) in styles {
        let _ = style.set_property(k, v);
    }
}

#[cfg(target_arch = "wasm32")]
impl Dom {
    /// Build the widget tree and attach it to `host`.
    pub(crate) fn build(host: HtmlElement, chart: &Chart, fullscreen: bool) -> Result<Self> {
        let document = host.owner_document().ok_or("Host element has no document")?;
        let colors = ThemeColors::for_theme(chart.theme());
        let options = chart.options();

        let root = create(&document, "div", "hv-root")?;
        set_styles(
            &root,
            &[
                ("position", "relative"),
                ("width", "100%"),
                ("height", "100%"),
                ("overflow", "hidden"),
                ("user-select", "none"),
                ("background", colors.background),
            ],
        );

        let canvas = create(&document, "canvas", "hv-canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Failed to create canvas")?;
        set_styles(
            canvas.unchecked_ref(),
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("pointer-events", "none"),
                ("z-index", "0"),
            ],
        );

        let scroller = |class: &str, overflow: (&str, &str)| -> Result<(HtmlElement, HtmlElement)> {
            let el = create(&document, "div", class)?;
            set_styles(
                &el,
                &[
                    ("position", "absolute"),
                    ("z-index", "1"),
                    (overflow.0, "scroll"),
                    (overflow.1, "hidden"),
                    ("display", "none"),
                ],
            );
            let spacer = create(&document, "div", "hv-spacer")?;
            set_styles(&spacer, &[("width", "1px"), ("height", "1px")]);
            let _ = el.append_child(&spacer);
            Ok((el, spacer))
        };
        let (col_scroll, col_spacer) = scroller("hv-scroll-x", ("overflow-x", "overflow-y"))?;
        let (row_scroll, row_spacer) = scroller("hv-scroll-y", ("overflow-y", "overflow-x"))?;

        let labels = create(&document, "div", "hv-labels")?;
        set_styles(
            &labels,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("pointer-events", "none"),
                ("z-index", "2"),
            ],
        );

        let panel = panel_style(&colors);

        let tooltip = create(&document, "div", "hv-tooltip")?;
        let _ = tooltip.set_attribute(
            "style",
            &format!("{panel}display:none;pointer-events:none;padding:4px 6px;border:1px solid {};", colors.muted_text),
        );

        let legend = create(&document, "div", "hv-legend")?;
        let _ = legend.set_attribute("style", &format!("{panel}left:4px;bottom:4px;"));

        let toolbar = create(&document, "div", "hv-toolbar")?;
        let _ = toolbar.set_attribute("style", &format!("{panel}top:4px;right:4px;"));
        toolbar.set_inner_html(&toolbar_html(options, fullscreen));

        let menu = create(&document, "div", "hv-options")?;
        let _ = menu.set_attribute(
            "style",
            &format!("{panel}top:32px;right:4px;display:none;flex-direction:column;gap:2px;padding:4px;"),
        );
        let search = create(&document, "input", "hv-search")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| "Failed to create search input")?;
        search.set_placeholder("Search labels");
        let _ = menu.append_child(&search);
        let fixed = create(&document, "div", "hv-options-fixed")?;
        fixed.set_inner_html(&menu_html(chart.is_locked()));
        let _ = menu.append_child(&fixed);
        let sort_list = create(&document, "div", "hv-sort")?;
        sort_list.set_inner_html(&sort_list_html(chart));
        let _ = menu.append_child(&sort_list);

        for child in [
            canvas.unchecked_ref::<HtmlElement>(),
            &col_scroll,
            &row_scroll,
            &labels,
            &legend,
            &toolbar,
            &menu,
            &tooltip,
        ] {
            let _ = root.append_child(child);
        }
        if options.show_version {
            let footer = create(&document, "div", "hv-version")?;
            let _ = footer.set_attribute("style", &format!("{panel}right:4px;bottom:4px;opacity:0.6;"));
            footer.set_text_content(Some(&footer_text()));
            let _ = root.append_child(&footer);
        }
        host.append_child(&root)
            .map_err(|_| "Failed to attach widget to element")?;

        let dom = Self {
            host,
            root,
            canvas,
            col_scroll,
            col_spacer,
            row_scroll,
            row_spacer,
            tooltip,
            labels,
            legend,
            toolbar,
            menu,
            menu_fixed: fixed,
            sort_list,
            search,
        };
        dom.refresh_legend(chart);
        Ok(dom)
    }

    /// Re-render data-dependent panel content.
    pub(crate) fn refresh_panels(&self, chart: &Chart) {
        self.sort_list.set_inner_html(&sort_list_html(chart));
        self.menu_fixed
            .set_inner_html(&menu_html(chart.is_locked()));
        self.refresh_legend(chart);
    }

    pub(crate) fn refresh_legend(&self, chart: &Chart) {
        let legend = chart.legend();
        let display = if legend.is_visible() { "block" } else { "none" };
        let _ = self.legend.style().set_property("display", display);
        self.legend.set_inner_html(&legend.to_html());
    }

    /// Move the label drag handles onto the labels of `frame`.
    pub(crate) fn sync_label_handles(&self, frame: &Frame) {
        self.labels.set_inner_html(&label_handles_html(frame));
    }

    pub(crate) fn toggle_menu(&self) {
        let style = self.menu.style();
        let shown = style.get_property_value("display").unwrap_or_default() == "flex";
        let _ = style.set_property("display", if shown { "none" } else { "flex" });
    }

    /// Show `html` near surface position `(x, y)`.
    pub(crate) fn show_tooltip(&self, html: &str, x: f64, y: f64) {
        self.tooltip.set_inner_html(html);
        let style = self.tooltip.style();
        let _ = style.set_property("left", &format!("{}px", x + 12.0));
        let _ = style.set_property("top", &format!("{}px", y + 12.0));
        let _ = style.set_property("display", "block");
    }

    pub(crate) fn hide_tooltip(&self) {
        let _ = self.tooltip.style().set_property("display", "none");
    }

    pub(crate) fn detach(&self) {
        let _ = self.host.remove_child(&self.root);
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
    use crate::types::{AxisLabel, ChartConfig};
    use test_case::test_case;

    #[test_case("options", None, None, None, Some(PanelAction::ToggleOptions) ; "options")]
    #[test_case("sort", Some("col"), Some("1"), None, Some(PanelAction::Sort(Axis::Col, 1)) ; "sort")]
    #[test_case("sort", Some("diag"), Some("1"), None, None ; "bad axis")]
    #[test_case("zoom", None, None, Some("-1"), Some(PanelAction::Zoom(None, -1.0)) ; "zoom both")]
    #[test_case("zoom", Some("row"), None, Some("1"), Some(PanelAction::Zoom(Some(Axis::Row), 1.0)) ; "zoom row")]
    #[test_case("zoom", None, None, None, None ; "zoom without delta")]
    #[test_case("explode", None, None, None, None ; "unknown")]
    fn parses_button_attributes(
        action: &str,
        axis: Option<&str>,
        cat: Option<&str>,
        delta: Option<&str>,
        expected: Option<PanelAction>,
    ) {
        assert_eq!(PanelAction::parse(action, axis, cat, delta), expected);
    }

    #[test]
    fn toolbar_honors_options() {
        let mut options = ChartOptions {
            options_label: Some("Menu".to_string()),
            ..ChartOptions::default()
        };
        let html = toolbar_html(&options, true);
        assert!(html.contains(">Menu</button>"));
        assert!(html.contains(r#"data-action="fullscreen""#));
        assert_eq!(html.matches(r#"data-action="zoom""#).count(), 6);

        options.hide_options = true;
        let html = toolbar_html(&options, false);
        assert!(!html.contains(r#"data-action="options""#));
        assert!(!html.contains("fullscreen"));
    }

    #[test]
    fn sort_list_shows_active_direction() {
        let rows = vec![
            AxisLabel::new("a").with_meta([Some("x")]),
            AxisLabel::new("b").with_meta([Some("y")]),
        ];
        let cols = vec![AxisLabel::new("c")];
        let mut config = ChartConfig::new(rows, cols, vec![vec![1.0], vec![2.0]]);
        config.row_meta_labels = Some(vec!["<group>".to_string()]);
        let mut chart = Chart::new(&config, 400.0, 300.0).unwrap();

        let html = sort_list_html(&chart);
        assert!(html.contains("Sort rows by &lt;group&gt;"));
        assert!(html.contains(r#"data-axis="row" data-cat="0""#));

        chart.toggle_sort(Axis::Row, 0).unwrap();
        assert!(sort_list_html(&chart).contains('\u{25b2}'));
    }

    #[test_case(Some("row"), Some("3"), Some((Axis::Row, 3)) ; "row")]
    #[test_case(Some("col"), Some("0"), Some((Axis::Col, 0)) ; "column")]
    #[test_case(Some("col"), Some("-1"), None ; "negative index")]
    #[test_case(None, Some("1"), None ; "missing axis")]
    fn parses_label_handles(axis: Option<&str>, index: Option<&str>, expected: Option<(Axis, usize)>) {
        assert_eq!(parse_handle(axis, index), expected);
    }

    #[test]
    fn handles_cover_per_item_labels_only() {
        let rows = vec![AxisLabel::new("a"), AxisLabel::new("b")];
        let cols = vec![AxisLabel::new("c")];
        let config = ChartConfig::new(rows, cols, vec![vec![1.0], vec![2.0]]);
        let mut chart = Chart::new(&config, 400.0, 300.0).unwrap();
        chart.render(&mut ApproxTextMeasure::default()).unwrap();

        let html = label_handles_html(chart.frame());
        assert_eq!(html.matches(r#"draggable="true""#).count(), 3);
        assert!(html.contains(r#"data-axis="row" data-index="1""#));
        assert!(html.contains(r#"data-axis="col" data-index="0""#));
        let hit = chart.frame().row_labels[0].hit;
        assert!(html.contains(&format!("left:{}px;top:{}px;", hit.x, hit.y)));

        // Collapsed range labels cannot be dragged.
        let rows = (0..400).map(|i| AxisLabel::new(format!("r{i}"))).collect();
        let config = ChartConfig::new(rows, vec![AxisLabel::new("c")], vec![vec![0.0]; 400]);
        let mut chart = Chart::new(&config, 400.0, 300.0).unwrap();
        chart.render(&mut ApproxTextMeasure::default()).unwrap();
        assert!(chart.frame().row_labels.iter().all(|l| l.index.is_none()));
        assert!(!label_handles_html(chart.frame()).contains(r#"data-axis="row""#));
    }

    #[test]
    fn footer_carries_version() {
        assert!(footer_text().ends_with(env!("CARGO_PKG_VERSION")));
    }
}
