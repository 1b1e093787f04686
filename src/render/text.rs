//! Label measurement, ellipsizing and search-match highlighting.
//!
//! Measurement is abstracted behind `TextMeasure` so the engine can lay out
//! labels natively (fixed-ratio estimate) and in the browser (canvas metrics).

use crate::interact::fold_case;
use crate::types::EllipsisPos;

/// Horizontal ellipsis.
pub const ELLIPSIS: &str = "\u{2026}";

/// Font family used for every label.
pub const FONT_FAMILY: &str = "sans-serif";

/// CSS font shorthand for a pixel size.
pub fn font_spec(font_px: f64) -> String {
    format!("{font_px:.1}px {FONT_FAMILY}")
}

/// Width of rendered text in pixels.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, font_px: f64) -> f64;
}

/// Fixed advance per character, as a fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMeasure {
    pub em_ratio: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMeasure for ApproxTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&mut self, text: &str, font_px: f64) -> f64 {
        text.chars().count() as f64 * font_px * self.em_ratio
    }
}

/// A possibly shortened label.
///
/// `head` original characters are kept at the front and `tail` at the back;
/// when either was cut, an ellipsis sits between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ellipsized {
    pub text: String,
    pub head: usize,
    pub tail: usize,
    pub cut: bool,
}

impl Ellipsized {
    fn whole(text: &str) -> Self {
        Self {
            text: text.to_string(),
            head: text.chars().count(),
            tail: 0,
            cut: false,
        }
    }

    fn build(chars: &[char], head: usize, tail: usize) -> Self {
        let n = chars.len();
        let mut text: String = chars.iter().take(head).collect();
        text.push_str(ELLIPSIS);
        text.extend(chars.iter().skip(n.saturating_sub(tail)));
        Self {
            text,
            head,
            tail,
            cut: true,
        }
    }
}

/// Split `keep` characters between head and tail for an ellipsis position.
fn split(keep: usize, pos: EllipsisPos) -> (usize, usize) {
    match pos {
        EllipsisPos::End => (keep, 0),
        EllipsisPos::Start => (0, keep),
        EllipsisPos::Middle => (keep.div_ceil(2), keep / 2),
    }
}

/// Shorten `text` to fit `max_width`, binary-searching the number of kept
/// characters.
pub fn ellipsize(
    measure: &mut dyn TextMeasure,
    text: &str,
    max_width: f64,
    font_px: f64,
    pos: EllipsisPos,
) -> Ellipsized {
    if measure.measure(text, font_px) <= max_width {
        return Ellipsized::whole(text);
    }
    let chars: Vec<char> = text.chars().collect();
    if measure.measure(ELLIPSIS, font_px) > max_width {
        return Ellipsized::build(&chars, 0, 0);
    }

    let mut low = 0;
    let mut high = chars.len().saturating_sub(1);
    while low < high {
        let mid = (low + high).div_ceil(2);
        let (head, tail) = split(mid, pos);
        let candidate = Ellipsized::build(&chars, head, tail);
        if measure.measure(&candidate.text, font_px) <= max_width {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    let (head, tail) = split(low, pos);
    Ellipsized::build(&chars, head, tail)
}

/// Longest suffix of `a` that is also a prefix of `b`, in characters.
pub fn overlap(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max = a.len().min(b.len());
    (1..=max)
        .rev()
        .find(|&k| a.get(a.len() - k..) == b.get(..k))
        .unwrap_or(0)
}

/// Char index of the first case-insensitive occurrence of `needle`.
fn find_chars(haystack: &str, needle: &str) -> Option<usize> {
    let h: Vec<char> = fold_case(haystack).chars().collect();
    let n: Vec<char> = fold_case(needle).chars().collect();
    if n.is_empty() || n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h.get(i..i + n.len()) == Some(n.as_slice()))
}

/// Characters of `label.text` to highlight for `query`, as a half-open char
/// range. Matches cut by the ellipsis highlight the visible overlap plus the
/// ellipsis itself.
pub fn highlight_range(original: &str, label: &Ellipsized, query: &str) -> Option<(usize, usize)> {
    let q_len = query.chars().count();
    find_chars(original, query)?;
    if !label.cut {
        let start = find_chars(&label.text, query)?;
        return Some((start, start + q_len));
    }

    let chars: Vec<char> = label.text.chars().collect();
    let head: String = chars.iter().take(label.head).collect();
    let tail: String = chars.iter().skip(label.head + 1).collect();
    if let Some(start) = find_chars(&head, query) {
        return Some((start, start + q_len));
    }
    if let Some(start) = find_chars(&tail, query) {
        let start = label.head + 1 + start;
        return Some((start, start + q_len));
    }
    let q = fold_case(query);
    let into_ellipsis = overlap(&fold_case(&head), &q);
    if into_ellipsis > 0 {
        return Some((label.head - into_ellipsis, label.head + 1));
    }
    let rev = |s: &str| s.chars().rev().collect::<String>();
    let out_of_ellipsis = overlap(&rev(&fold_case(&tail)), &rev(&q));
    if out_of_ellipsis > 0 {
        return Some((label.head, label.head + 1 + out_of_ellipsis));
    }
    // Match lies entirely inside the elided part.
    Some((label.head, label.head + 1))
}

/// Pixel span of a char range within `text`.
pub fn char_span_px(
    measure: &mut dyn TextMeasure,
    text: &str,
    range: (usize, usize),
    font_px: f64,
) -> (f64, f64) {
    let before: String = text.chars().take(range.0).collect();
    let through: String = text.chars().take(range.1).collect();
    (
        measure.measure(&before, font_px),
        measure.measure(&through, font_px),
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
    use test_case::test_case;

    /// One pixel per character.
    struct Unit;

    impl TextMeasure for Unit {
        #[allow(clippy::cast_precision_loss)]
        fn measure(&mut self, text: &str, _font_px: f64) -> f64 {
            text.chars().count() as f64
        }
    }

    #[test_case(EllipsisPos::End, "abcdefg…" ; "end")]
    #[test_case(EllipsisPos::Start, "…nopqrst" ; "start")]
    #[test_case(EllipsisPos::Middle, "abcd…qrst" ; "middle")]
    fn ellipsis_positions(pos: EllipsisPos, expected: &str) {
        let width = if pos == EllipsisPos::Middle { 9.0 } else { 8.0 };
        let label = ellipsize(&mut Unit, "abcdefghijklmnopqrst", width, 10.0, pos);
        assert_eq!(label.text, expected);
        assert!(label.cut);
    }

    #[test]
    fn fitting_text_is_untouched() {
        let label = ellipsize(&mut Unit, "short", 5.0, 10.0, EllipsisPos::End);
        assert_eq!(label.text, "short");
        assert!(!label.cut);
    }

    #[test]
    fn no_room_leaves_only_ellipsis() {
        let label = ellipsize(&mut Unit, "abc", 1.0, 10.0, EllipsisPos::End);
        assert_eq!(label.text, ELLIPSIS);
        let label = ellipsize(&mut Unit, "abc", 0.5, 10.0, EllipsisPos::End);
        assert_eq!(label.text, ELLIPSIS);
    }

    #[test]
    fn overlap_finds_longest_suffix_prefix() {
        assert_eq!(overlap("escherichi", "chia coli"), 3);
        assert_eq!(overlap("abc", "xyz"), 0);
        assert_eq!(overlap("aaa", "aa"), 2);
    }

    #[test]
    fn highlight_plain_match_is_case_insensitive() {
        let label = Ellipsized::whole("Escherichia");
        assert_eq!(highlight_range("Escherichia", &label, "RICH"), Some((5, 9)));
        assert_eq!(highlight_range("Escherichia", &label, "zzz"), None);
    }

    #[test_case("bul", Some((5, 8)) ; "after dotted capital")]
    #[test_case("\u{130}ST", Some((0, 3)) ; "dotted capital in query")]
    #[test_case("\u{d6}l\u{e7}", Some((9, 12)) ; "second word")]
    fn highlight_stays_aligned_after_case_folding(query: &str, expected: Option<(usize, usize)>) {
        let original = "\u{130}stanbul \u{d6}l\u{e7}ek";
        let label = Ellipsized::whole(original);
        assert_eq!(highlight_range(original, &label, query), expected);
    }

    #[test]
    fn highlight_match_cut_by_end_ellipsis() {
        let original = "Escherichia coli";
        let label = ellipsize(&mut Unit, original, 11.0, 10.0, EllipsisPos::End);
        assert_eq!(label.text, "Escherichi…");
        assert_eq!(highlight_range(original, &label, "chia"), Some((7, 11)));
    }

    #[test]
    fn highlight_match_cut_by_start_ellipsis() {
        let original = "Escherichia coli";
        let label = ellipsize(&mut Unit, original, 7.0, 10.0, EllipsisPos::Start);
        assert_eq!(label.text, "…a coli");
        assert_eq!(highlight_range(original, &label, "chia"), Some((0, 2)));
    }

    #[test]
    fn char_span_measures_prefixes() {
        assert_eq!(char_span_px(&mut Unit, "abcdef", (2, 4), 10.0), (2.0, 4.0));
    }
}
