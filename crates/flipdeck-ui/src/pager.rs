//! Full-screen card viewer with vertical swipe paging.

use flipdeck_core::*;
use web_time::Duration;

/// Vertical travel (px) a release needs to change cards.
pub const PAGE_SWIPE_DISTANCE: f32 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct CardPager {
    len: usize,
    index: usize,
    open: bool,
    offset: SpringValue,
}

impl CardPager {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            open: false,
            offset: SpringValue::new(0.0, SpringSpec::DEFAULT),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shows the viewer at `initial`, clamped to the last card.
    pub fn open(&mut self, initial: usize) {
        self.index = initial.min(self.len.saturating_sub(1));
        self.open = true;
        self.offset.snap_to(0.0);
        log::debug!("card viewer opened at {}/{}", self.index, self.len);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.offset.snap_to(0.0);
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn visible_index(&self) -> Option<usize> {
        (self.open && self.len > 0).then_some(self.index)
    }

    /// Vertical offset of the visible card.
    pub fn translate_y(&self) -> f32 {
        self.offset.get()
    }

    pub fn drag_update(&mut self, translation_y: f32) {
        if self.open {
            self.offset.snap_to(translation_y);
        }
    }

    /// Ends a vertical drag; returns the new visible index.
    pub fn drag_end(&mut self, translation_y: f32) -> Option<usize> {
        if !self.open {
            return None;
        }
        self.offset.snap_to(translation_y);
        if self.len > 0 {
            if translation_y < -PAGE_SWIPE_DISTANCE && self.index + 1 < self.len {
                self.index += 1;
                log::debug!("card viewer -> next ({})", self.index);
            } else if translation_y > PAGE_SWIPE_DISTANCE && self.index > 0 {
                self.index -= 1;
                log::debug!("card viewer -> previous ({})", self.index);
            }
        }
        self.offset.animate_to(0.0);
        self.visible_index()
    }

    /// Advances the return spring; true while it is still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.offset.step(dt)
    }
}
