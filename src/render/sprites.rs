//! Retained drawables: the cell pool and category strip pools.
//!
//! Pools grow to the largest size ever requested and never shrink; each
//! redraw repositions, recolors and toggles existing entries in place.

use crate::layout::Rect;
use crate::render::colors::Rgb;

/// Something a pool can show or hide.
pub trait Sprite: Default {
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellSprite {
    pub rect: Rect,
    pub color: Rgb,
    pub row: usize,
    pub col: usize,
    pub visible: bool,
}

impl Sprite for CellSprite {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// One category color box next to a row or above a column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StripSprite {
    pub rect: Rect,
    pub color: Rgb,
    /// Data index of the row/column.
    pub index: usize,
    /// Metadata category index.
    pub category: usize,
    pub visible: bool,
}

impl Sprite for StripSprite {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Fixed-capacity retained collection.
#[derive(Debug, Clone, Default)]
pub struct SpritePool<T> {
    items: Vec<T>,
    grow_count: usize,
}

impl<T: Sprite> SpritePool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            grow_count: 0,
        }
    }

    /// Grow to at least `n` entries. Never shrinks.
    pub fn reserve(&mut self, n: usize) {
        if n > self.items.len() {
            self.items.resize_with(n, T::default);
            self.grow_count += 1;
        }
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// How many times the pool had to grow.
    pub fn grow_count(&self) -> usize {
        self.grow_count
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.items.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.items.get_mut(i)
    }

    /// Hide every entry at or after `from`.
    pub fn hide_from(&mut self, from: usize) {
        for item in self.items.iter_mut().skip(from) {
            item.set_visible(false);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|s| s.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
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
    fn pool_grows_to_max_and_never_shrinks() {
        let mut pool: SpritePool<CellSprite> = SpritePool::new();
        pool.reserve(4);
        pool.reserve(2);
        assert_eq!(pool.capacity(), 4);
        pool.reserve(9);
        assert_eq!(pool.capacity(), 9);
        assert_eq!(pool.grow_count(), 2);
    }

    #[test]
    fn hide_from_toggles_tail() {
        let mut pool: SpritePool<StripSprite> = SpritePool::new();
        pool.reserve(3);
        for i in 0..3 {
            pool.get_mut(i).unwrap().visible = true;
        }
        pool.hide_from(1);
        assert_eq!(pool.visible_count(), 1);
        assert!(pool.get(0).unwrap().visible);
    }
}
