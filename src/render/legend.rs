//! Legend model and its HTML rendering.

use super::colors::Rgb;
use crate::color::ColorScale;
use crate::error::Result;
use crate::types::{ChartOptions, ColorConfig, MatrixStats};

/// One swatch of a binned legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub color: Rgb,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Legend {
    Hidden,
    /// User-supplied legend content, shown verbatim.
    Custom(String),
    Bins(Vec<LegendItem>),
    Gradient {
        min: f64,
        max: f64,
        start: Rgb,
        end: Rgb,
    },
}

impl Legend {
    pub fn build(options: &ChartOptions, color: &ColorConfig, stats: &MatrixStats) -> Result<Self> {
        if let Some(custom) = &options.legend {
            return Ok(Self::Custom(custom.clone()));
        }
        if options.hide_legend {
            return Ok(Self::Hidden);
        }
        let legend = match ColorScale::from_config(color, stats.abs_max)? {
            ColorScale::Gradient { start, end, .. } => Self::Gradient {
                min: stats.min,
                max: stats.max,
                start,
                end,
            },
            ColorScale::Bins { bins, colors, .. } => Self::Bins(
                bins.iter()
                    .zip(colors)
                    .map(|(bin, color)| LegendItem {
                        color,
                        label: bin.to_string(),
                    })
                    .collect(),
            ),
        };
        Ok(legend)
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Markup for the legend panel. Custom content is passed through.
    pub fn to_html(&self) -> String {
        match self {
            Self::Hidden => String::new(),
            Self::Custom(html) => html.clone(),
            Self::Bins(items) => {
                let mut out = String::from(r#"<div class="hv-legend">"#);
                for item in items {
                    out.push_str(&format!(
                        r#"<span class="hv-legend-item"><span class="hv-swatch" style="background:{}"></span>{}</span>"#,
                        item.color.to_hex(),
                        escape_html(&item.label)
                    ));
                }
                out.push_str("</div>");
                out
            }
            Self::Gradient {
                min,
                max,
                start,
                end,
            } => format!(
                r#"<div class="hv-legend"><span>{}</span><span class="hv-gradient" style="background:linear-gradient(to right, {}, {})"></span><span>{}</span></div>"#,
                format_value(*min),
                start.to_hex(),
                end.to_hex(),
                format_value(*max)
            ),
        }
    }
}

/// Compact number formatting for legend endpoints and tooltips.
pub fn format_value(v: f64) -> String {
    if v.fract().abs() < f64::EPSILON && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Escape text for insertion into HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
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
    use crate::types::matrix_stats;

    fn stats() -> MatrixStats {
        matrix_stats(&[vec![-2.0, 1.0], vec![3.5, 0.0]]).unwrap()
    }

    #[test]
    fn bins_become_swatches_in_order() {
        let color = ColorConfig::bins(["<0", ">=0"], ["#0000FF", "#FF0000"]);
        let legend = Legend::build(&ChartOptions::default(), &color, &stats()).unwrap();
        let Legend::Bins(items) = legend else {
            panic!("expected bins");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "< 0");
        assert_eq!(items[1].color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn gradient_shows_min_and_max() {
        let legend = Legend::build(&ChartOptions::default(), &ColorConfig::default(), &stats()).unwrap();
        let html = legend.to_html();
        assert!(html.contains("<span>-2</span>"));
        assert!(html.contains("<span>3.5</span>"));
    }

    #[test]
    fn custom_legend_wins_over_hide_flag() {
        let options = ChartOptions {
            legend: Some("<b>mine</b>".to_string()),
            hide_legend: true,
            ..ChartOptions::default()
        };
        let legend = Legend::build(&options, &ColorConfig::default(), &stats()).unwrap();
        assert_eq!(legend.to_html(), "<b>mine</b>");
    }

    #[test]
    fn hidden_legend_is_empty() {
        let options = ChartOptions {
            hide_legend: true,
            ..ChartOptions::default()
        };
        let legend = Legend::build(&options, &ColorConfig::default(), &stats()).unwrap();
        assert!(!legend.is_visible());
        assert!(legend.to_html().is_empty());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn formats_values_compactly() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.125), "0.125");
        assert_eq!(format_value(1.5), "1.5");
    }
}
