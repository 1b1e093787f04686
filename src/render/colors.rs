//! Color parsing and palettes.
//!
//! Cell colors are kept as packed `Rgb` values so the resolved color matrix
//! stays small and cheap to copy; CSS strings are produced only at draw time.

use crate::types::Theme;

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` value.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_packed(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some(Self { r, g, b })
            }
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16));
                let r = it.next()??;
                let g = it.next()??;
                let b = it.next()??;
                Some(Self::new((r * 17) as u8, (g * 17) as u8, (b * 17) as u8))
            }
            _ => None,
        }
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear interpolation toward `to`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            r: Self::blend_component(self.r, to.r, t),
            g: Self::blend_component(self.g, to.g, t),
            b: Self::blend_component(self.b, to.b, t),
        }
    }

    /// Blend a single color component toward a target.
    /// The cast is safe because we clamp to [0, 255] before converting.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        let blended = from + (to - from) * factor.clamp(0.0, 1.0);
        blended.clamp(0.0, 255.0).round() as u8
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Parse a configured color into `Rgb`.
///
/// Supports formats:
/// - "#RRGGBB" / "#RGB"
/// - "RRGGBB" (hex without # prefix)
/// - "rgb(r, g, b)" and "rgba(r, g, b, a)" (alpha is ignored)
/// - a handful of CSS names
pub fn parse_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    if s.starts_with('#') {
        Rgb::from_hex(s)
    } else if s.starts_with("rgba(") {
        parse_rgb_components(s.strip_prefix("rgba(")?.strip_suffix(')')?, 4)
    } else if s.starts_with("rgb(") {
        parse_rgb_components(s.strip_prefix("rgb(")?.strip_suffix(')')?, 3)
    } else {
        named_color(s).or_else(|| Rgb::from_hex(s))
    }
}

fn parse_rgb_components(inner: &str, expected: usize) -> Option<Rgb> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return None;
    }
    let mut it = parts.iter();
    let r: u8 = it.next()?.parse().ok()?;
    let g: u8 = it.next()?.parse().ok()?;
    let b: u8 = it.next()?.parse().ok()?;
    if let Some(alpha) = it.next() {
        alpha.parse::<f64>().ok()?;
    }
    Some(Rgb::new(r, g, b))
}

fn named_color(s: &str) -> Option<Rgb> {
    let packed = match s.to_ascii_lowercase().as_str() {
        "black" => 0x000000,
        "white" => 0xFFFFFF,
        "red" => 0xFF0000,
        "green" => 0x008000,
        "blue" => 0x0000FF,
        "yellow" => 0xFFFF00,
        "orange" => 0xFFA500,
        "purple" => 0x800080,
        "gray" | "grey" => 0x808080,
        _ => return None,
    };
    Some(Rgb::from_packed(packed))
}

/// Fixed colors used by the heatmap.
pub mod palette {
    use super::Rgb;

    /// Gradient start (value 0).
    pub const GRADIENT_START: Rgb = Rgb::from_packed(0xFFFFFF);
    /// Gradient end (matrix absolute max).
    pub const GRADIENT_END: Rgb = Rgb::from_packed(0xD7191C);

    /// Color for missing category values.
    pub const CATEGORY_MISSING: Rgb = Rgb::from_packed(0xBBBBBB);

    /// 20-entry categorical palette.
    pub const CATEGORY: [Rgb; 20] = [
        Rgb::from_packed(0x1F77B4),
        Rgb::from_packed(0xAEC7E8),
        Rgb::from_packed(0xFF7F0E),
        Rgb::from_packed(0xFFBB78),
        Rgb::from_packed(0x2CA02C),
        Rgb::from_packed(0x98DF8A),
        Rgb::from_packed(0xD62728),
        Rgb::from_packed(0xFF9896),
        Rgb::from_packed(0x9467BD),
        Rgb::from_packed(0xC5B0D5),
        Rgb::from_packed(0x8C564B),
        Rgb::from_packed(0xC49C94),
        Rgb::from_packed(0xE377C2),
        Rgb::from_packed(0xF7B6D2),
        Rgb::from_packed(0x7F7F7F),
        Rgb::from_packed(0xC7C7C7),
        Rgb::from_packed(0xBCBD22),
        Rgb::from_packed(0xDBDB8D),
        Rgb::from_packed(0x17BECF),
        Rgb::from_packed(0x9EDAE5),
    ];

    /// Selection rectangle outline.
    pub const SELECTION: &str = "#1A73E8";
    /// Selection rectangle fill.
    pub const SELECTION_FILL: &str = "rgba(26, 115, 232, 0.15)";
    /// Reorder guide line.
    pub const DRAG_GUIDE: &str = "#E8710A";
    /// Search highlight band behind matching label characters.
    pub const SEARCH_HIGHLIGHT: &str = "#FFE066";
}

/// Chrome colors for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: &'static str,
    pub text: &'static str,
    pub muted_text: &'static str,
    pub hover: &'static str,
    pub scrollbar_track: &'static str,
    pub scrollbar_thumb: &'static str,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: "#FFFFFF",
                text: "#202124",
                muted_text: "#5F6368",
                hover: "#000000",
                scrollbar_track: "#F5F5F5",
                scrollbar_thumb: "#B4B4B4",
            },
            Theme::Dark => Self {
                background: "#1E1E1E",
                text: "#E8EAED",
                muted_text: "#9AA0A6",
                hover: "#FFFFFF",
                scrollbar_track: "#2B2B2B",
                scrollbar_thumb: "#5F6368",
            },
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

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_color("#FF0000").unwrap(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_parse_hex_3() {
        assert_eq!(parse_color("#0f0").unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(
            parse_color("rgb(255, 128, 64)").unwrap(),
            Rgb::new(255, 128, 64)
        );
    }

    #[test]
    fn test_parse_rgba_ignores_alpha() {
        assert_eq!(
            parse_color("rgba(255, 128, 64, 0.5)").unwrap(),
            Rgb::new(255, 128, 64)
        );
        assert!(parse_color("rgba(255, 128, 64)").is_none());
    }

    #[test]
    fn test_parse_without_hash_and_names() {
        assert_eq!(parse_color("00FF00").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(parse_color("Blue").unwrap(), Rgb::new(0, 0, 255));
        assert!(parse_color("not-a-color").is_none());
    }

    #[test]
    fn test_packed_round_trip() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_packed(), 0x123456);
        assert_eq!(Rgb::from_packed(0x123456), c);
        assert_eq!(c.to_hex(), "#123456");
    }

    #[test]
    fn test_lerp_clamps_weight() {
        let a = Rgb::new(255, 255, 255);
        let b = Rgb::new(0, 0, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, -3.0), a);
        assert_eq!(a.lerp(b, 9.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(128, 128, 128));
    }
}
