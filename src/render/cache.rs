//! Memoized text measurement.
//!
//! Label layout measures the same strings over and over while the user
//! scrolls; `CachedMeasure` wraps any `TextMeasure` with a bounded cache.

use std::collections::{HashMap, VecDeque};

use super::text::TextMeasure;

/// Default number of cached widths.
pub const MEASURE_CACHE_CAP: usize = 4096;

/// Key: font size bits and the text.
type Key = (u64, String);

/// Bounded width cache in front of a measurer.
///
/// Eviction is by insertion order; lookups do not promote entries.
pub struct CachedMeasure<M> {
    inner: M,
    widths: HashMap<Key, f64>,
    order: VecDeque<Key>,
    capacity: usize,
    hits: u64,
}

impl<M: TextMeasure> CachedMeasure<M> {
    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, MEASURE_CACHE_CAP)
    }

    /// A capacity of 0 disables caching.
    pub fn with_capacity(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            widths: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Number of measurements answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Drop every entry, e.g. after a font finished loading.
    pub fn clear(&mut self) {
        self.widths.clear();
        self.order.clear();
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    fn insert(&mut self, key: Key, width: f64) {
        if self.capacity == 0 {
            return;
        }
        self.order.push_back(key.clone());
        self.widths.insert(key, width);
        while self.widths.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.widths.remove(&oldest);
        }
    }
}

impl<M: TextMeasure> TextMeasure for CachedMeasure<M> {
    fn measure(&mut self, text: &str, font_px: f64) -> f64 {
        let key = (font_px.to_bits(), text.to_string());
        if let Some(&w) = self.widths.get(&key) {
            self.hits += 1;
            return w;
        }
        let w = self.inner.measure(text, font_px);
        self.insert(key, w);
        w
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

    #[derive(Default)]
    struct Counting {
        calls: usize,
    }

    impl TextMeasure for Counting {
        #[allow(clippy::cast_precision_loss)]
        fn measure(&mut self, text: &str, font_px: f64) -> f64 {
            self.calls += 1;
            text.len() as f64 * font_px
        }
    }

    #[test]
    fn repeated_measure_hits_cache() {
        let mut m = CachedMeasure::new(Counting::default());
        assert_eq!(m.measure("abc", 2.0), 6.0);
        assert_eq!(m.measure("abc", 2.0), 6.0);
        assert_eq!(m.inner_mut().calls, 1);
        assert_eq!(m.hits(), 1);
        // Different size is a different entry.
        assert_eq!(m.measure("abc", 3.0), 9.0);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut m = CachedMeasure::with_capacity(Counting::default(), 2);
        m.measure("a", 1.0);
        m.measure("b", 1.0);
        m.measure("c", 1.0);
        assert_eq!(m.len(), 2);
        m.measure("a", 1.0);
        assert_eq!(m.inner_mut().calls, 4);
    }

    #[test]
    fn zero_capacity_never_caches() {
        let mut m = CachedMeasure::with_capacity(Counting::default(), 0);
        m.measure("a", 1.0);
        m.measure("a", 1.0);
        assert!(m.is_empty());
        assert_eq!(m.inner_mut().calls, 2);
    }
}
