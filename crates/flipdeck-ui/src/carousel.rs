//! Full-screen vertical showcase carousel.
//!
//! Each page derives its layer styles from the shared scroll offset: the
//! focused page is opaque at scale 1, neighbours fade out while the page
//! below grows in and the page above shrinks away. Crossing into a new page
//! gives a light haptic tick.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flipdeck_core::*;

use crate::error::CarouselError;
use crate::haptics::{HapticFeedback, ImpactStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    Ios,
    Android,
    Web,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

/// Which set of curves a page uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShowcaseVariant {
    /// Blurred artwork backdrop that sticks while the page scrolls away.
    #[default]
    Standard,
    /// Gradient backdrop plus a separately scaled card layer.
    Collection,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStyle {
    pub opacity: f32,
    pub transform: Transform,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::identity(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShowcaseItemStyle {
    /// Title, card and caption column.
    pub container: LayerStyle,
    /// Full-bleed layer behind the container.
    pub backdrop: LayerStyle,
    /// The flip card itself, inside the container.
    pub card: LayerStyle,
}

/// Layer styles for page `index` at scroll offset `scroll_y`.
///
/// `page_size` must be positive; `Carousel` guarantees that.
pub fn showcase_item_style(
    scroll_y: f32,
    index: usize,
    page_size: f32,
    variant: ShowcaseVariant,
    appearance: Appearance,
    platform: Platform,
) -> ShowcaseItemStyle {
    let i = index as f32;
    let h = page_size;
    let animated_index = scroll_y / h;

    let pages = [i - 1.0, i, i + 1.0];
    let range = [(i - 1.0) * h, i * h, (i + 1.0) * h];
    // Zero until the page starts leaving, then follows the scroll 1:1.
    let sticky = [(i - 1.0) * h, i * h, i * h + 1.0];
    let parallax = interpolate(scroll_y, &sticky, &[0.0, 0.0, 1.0], Extrapolation::EXTEND);
    let fade = |peak: f32| {
        interpolate(animated_index, &pages, &[0.0, peak, 0.0], Extrapolation::CLAMP)
    };
    let layer = |opacity: f32, translate_y: f32, scale: f32| LayerStyle {
        opacity,
        transform: Transform::translate(0.0, translate_y).combine(&Transform::scale(scale)),
    };

    let container_scale_ex = match variant {
        ShowcaseVariant::Standard => Extrapolation::CLAMP_RIGHT,
        ShowcaseVariant::Collection => Extrapolation::CLAMP,
    };
    let container = layer(
        fade(1.0),
        if platform == Platform::Ios { parallax } else { 0.0 },
        interpolate(scroll_y, &range, &[1.2, 1.0, 0.5], container_scale_ex),
    );

    let dark = appearance == Appearance::Dark;
    match variant {
        ShowcaseVariant::Standard => ShowcaseItemStyle {
            container,
            backdrop: layer(
                fade(if dark { 0.15 } else { 0.3 }),
                parallax,
                interpolate(scroll_y, &range, &[5.0, 1.0, 1.0], Extrapolation::CLAMP_RIGHT),
            ),
            card: LayerStyle::default(),
        },
        ShowcaseVariant::Collection => ShowcaseItemStyle {
            container,
            backdrop: layer(
                fade(if dark { 0.5 } else { 0.7 }),
                0.0,
                interpolate(scroll_y, &range, &[1.8, 1.0, 1.0], Extrapolation::CLAMP),
            ),
            card: layer(
                fade(1.0),
                0.0,
                interpolate(scroll_y, &range, &[1.5, 1.0, 0.8], Extrapolation::CLAMP),
            ),
        },
    }
}

pub struct Carousel {
    page_count: usize,
    page_size: f32,
    offset: Signal<f32>,
    page: Cell<i64>,
    programmatic: RefCell<Option<AnimatedValue<f32>>>,
    haptics: Rc<dyn HapticFeedback>,
}

impl Carousel {
    pub fn new(
        page_count: usize,
        page_size: f32,
        haptics: Rc<dyn HapticFeedback>,
    ) -> Result<Self, CarouselError> {
        if !(page_size.is_finite() && page_size > 0.0) {
            return Err(CarouselError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_count,
            page_size,
            offset: signal(0.0),
            page: Cell::new(0),
            programmatic: RefCell::new(None),
            haptics,
        })
    }

    /// Starts on `page` (clamped to the carousel) without a haptic.
    pub fn initial_page(self, page: usize) -> Self {
        let page = page.min(self.page_count.saturating_sub(1));
        self.offset.set(page as f32 * self.page_size);
        self.page.set(page as i64);
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_size(&self) -> f32 {
        self.page_size
    }

    /// Shared handle to the scroll offset.
    pub fn offset_signal(&self) -> Signal<f32> {
        self.offset.clone()
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    /// Scroll position in pages; fractional between pages.
    pub fn animated_index(&self) -> f32 {
        self.offset() / self.page_size
    }

    /// Page nearest to the current offset.
    pub fn page(&self) -> i64 {
        self.page.get()
    }

    /// User-driven scroll; cancels any programmatic scroll.
    pub fn scroll_to(&self, y: f32) {
        self.programmatic.borrow_mut().take();
        self.set_offset(y);
    }

    /// Animates to `page` (clamped to the carousel) on the animation clock.
    pub fn scroll_to_page(&self, page: usize, spec: AnimationSpec) {
        let target = page.min(self.page_count.saturating_sub(1)) as f32 * self.page_size;
        let mut anim = AnimatedValue::new(self.offset(), spec);
        anim.set_target(target);
        *self.programmatic.borrow_mut() = Some(anim);
    }

    /// Snap-to-interval on release: settles on the nearest page.
    pub fn release(&self) {
        let nearest = self.animated_index().round().max(0.0) as usize;
        self.scroll_to_page(nearest, AnimationSpec::fast());
    }

    /// Advances a programmatic scroll; returns true while still moving.
    pub fn update(&self) -> bool {
        let step = {
            let mut slot = self.programmatic.borrow_mut();
            let Some(anim) = slot.as_mut() else {
                return false;
            };
            let running = anim.update();
            let y = *anim.get();
            if !running {
                *slot = None;
            }
            (y, running)
        };
        self.set_offset(step.0);
        step.1
    }

    pub fn item_style(
        &self,
        index: usize,
        variant: ShowcaseVariant,
        appearance: Appearance,
        platform: Platform,
    ) -> ShowcaseItemStyle {
        showcase_item_style(
            self.offset(),
            index,
            self.page_size,
            variant,
            appearance,
            platform,
        )
    }

    fn set_offset(&self, y: f32) {
        self.offset.set(y);
        let page = (y / self.page_size).round() as i64;
        let previous = self.page.replace(page);
        if page != previous && page >= 0 && (page as usize) < self.page_count {
            log::debug!("carousel page {previous} -> {page}");
            self.haptics.impact(ImpactStyle::Light);
        }
    }
}
