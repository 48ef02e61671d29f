//! # FlipCard
//!
//! A container that shows one of two faces and flips between them on tap or
//! horizontal drag. The card is headless: it owns the interaction state and
//! hands the host per-face styles to render with.
//!
//! ```rust
//! use std::rc::Rc;
//! use flipdeck_ui::*;
//!
//! let card = FlipCard::new(
//!     FlipCardProps::new("front", "back").width(Dimension::Points(200.0)),
//!     Rc::new(NoopHaptics),
//! )
//! .unwrap();
//!
//! card.handle(GestureEvent::Tap);
//! assert!(card.is_flipped());
//! while card.tick(web_time::Duration::from_millis(16)) {}
//! assert_eq!(card.phase(), FlipPhase::RestingBack);
//! ```
//!
//! State lives in a single `Signal<FlipState>`. Gesture handling writes to it,
//! style computation reads from it, and hosts may `subscribe` to observe the
//! logical side.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flipdeck_core::*;
use web_time::{Duration, Instant};

use crate::error::FlipCardError;
use crate::gestures::{FlipGestureDetector, GestureEvent, PanConfig, TapConfig};
use crate::haptics::{HapticFeedback, ImpactStyle};

/// Resting rotation of the front face.
pub const FRONT_ROTATION: f32 = 0.0;
/// Resting rotation of the back face.
pub const BACK_ROTATION: f32 = 180.0;

const OPACITY_STOPS: [f32; 3] = [0.0, 90.0, 180.0];
const FRONT_OPACITY: [f32; 3] = [1.0, 0.0, 0.0];
const BACK_OPACITY: [f32; 3] = [0.0, 0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlipConfig {
    /// Degrees of rotation per pixel of horizontal drag.
    pub sensitivity: f32,
    /// Drag distance (px) strictly above which a release commits.
    pub commit_distance: f32,
    /// Release speed (px/s) strictly above which a release commits.
    pub commit_velocity: f32,
    pub pan: PanConfig,
    pub tap: TapConfig,
    pub spring: SpringSpec,
    pub haptic: ImpactStyle,
    pub perspective: f32,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.3,
            commit_distance: 60.0,
            commit_velocity: 400.0,
            pan: PanConfig::default(),
            tap: TapConfig::default(),
            spring: SpringSpec::new(20.0, 90.0),
            haptic: ImpactStyle::Light,
            perspective: 1000.0,
        }
    }
}

impl FlipConfig {
    pub fn sensitivity(mut self, degrees_per_px: f32) -> Self {
        self.sensitivity = degrees_per_px;
        self
    }

    pub fn commit_thresholds(mut self, distance: f32, velocity: f32) -> Self {
        self.commit_distance = distance;
        self.commit_velocity = velocity;
        self
    }

    pub fn spring(mut self, spring: SpringSpec) -> Self {
        self.spring = spring;
        self
    }

    pub fn haptic(mut self, style: ImpactStyle) -> Self {
        self.haptic = style;
        self
    }

    pub fn validate(&self) -> Result<(), FlipCardError> {
        let checks = [
            ("sensitivity", self.sensitivity),
            ("commit_distance", self.commit_distance),
            ("commit_velocity", self.commit_velocity),
            ("pan.active_offset_x", self.pan.active_offset_x),
            ("pan.fail_offset_y", self.pan.fail_offset_y),
            ("tap.max_distance", self.tap.max_distance),
            ("perspective", self.perspective),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FlipCardError::InvalidThreshold { name, value });
            }
        }
        self.spring.validate()?;
        Ok(())
    }
}

/// A layout length: absolute points or a share of the parent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Points(f32),
    Percent(f32),
}

impl Dimension {
    pub fn resolve(&self, parent: f32) -> f32 {
        match *self {
            Dimension::Points(p) => p,
            Dimension::Percent(pct) => parent * pct / 100.0,
        }
    }

    fn validate(&self, axis: &'static str) -> Result<(), FlipCardError> {
        let value = match *self {
            Dimension::Points(v) | Dimension::Percent(v) => v,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(FlipCardError::InvalidDimension { axis, value })
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
}

/// Container styling; `None` fields leave the underlying value alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerStyle {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub overflow: Option<Overflow>,
    pub corner_radius: Option<f32>,
    pub opacity: Option<f32>,
}

impl ContainerStyle {
    /// `other` laid over `self`: every field `other` sets wins.
    pub fn merge(self, other: &ContainerStyle) -> ContainerStyle {
        ContainerStyle {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            overflow: other.overflow.or(self.overflow),
            corner_radius: other.corner_radius.or(self.corner_radius),
            opacity: other.opacity.or(self.opacity),
        }
    }
}

pub struct FlipCardProps<C> {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub front: C,
    pub back: C,
    pub style: Option<ContainerStyle>,
}

impl<C> FlipCardProps<C> {
    pub fn new(front: C, back: C) -> Self {
        Self {
            width: None,
            height: None,
            front,
            back,
            style: None,
        }
    }

    pub fn width(mut self, width: Dimension) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.height = Some(height);
        self
    }

    pub fn style(mut self, style: ContainerStyle) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    Front,
    Back,
}

impl Face {
    pub fn rotation(self) -> f32 {
        match self {
            Face::Front => FRONT_ROTATION,
            Face::Back => BACK_ROTATION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipPhase {
    RestingFront,
    RestingBack,
    Dragging,
    Settling,
}

/// What a gesture did to the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The logical side toggled.
    Committed(Face),
    /// Released without flipping; settling back onto this side.
    SnappedBack(Face),
    /// Drag started or moved.
    Tracking,
    /// The event had no meaning in the current phase.
    Ignored,
}

/// Per-card interaction state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipState {
    rotation: SpringValue,
    is_flipped: bool,
    drag_start_rotation: Option<f32>,
}

impl FlipState {
    pub fn new(spring: SpringSpec) -> Self {
        Self {
            rotation: SpringValue::new(FRONT_ROTATION, spring),
            is_flipped: false,
            drag_start_rotation: None,
        }
    }

    /// Current angle in degrees; unbounded while dragging.
    pub fn rotation(&self) -> f32 {
        self.rotation.get()
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn drag_start_rotation(&self) -> Option<f32> {
        self.drag_start_rotation
    }

    /// The side the card rests on (or is settling toward).
    pub fn resting_face(&self) -> Face {
        if self.is_flipped { Face::Back } else { Face::Front }
    }

    pub fn phase(&self) -> FlipPhase {
        if self.drag_start_rotation.is_some() {
            FlipPhase::Dragging
        } else if self.rotation.is_animating() {
            FlipPhase::Settling
        } else if self.is_flipped {
            FlipPhase::RestingBack
        } else {
            FlipPhase::RestingFront
        }
    }

    /// Applies one gesture. Never fails: every input maps to a transition.
    pub fn apply(&mut self, event: GestureEvent, config: &FlipConfig) -> FlipOutcome {
        match event {
            GestureEvent::Tap => {
                if self.drag_start_rotation.is_some() {
                    return FlipOutcome::Ignored;
                }
                self.toggle()
            }
            GestureEvent::DragBegin => {
                if self.drag_start_rotation.is_some() {
                    return FlipOutcome::Ignored;
                }
                self.drag_start_rotation = Some(self.rotation.get());
                FlipOutcome::Tracking
            }
            GestureEvent::DragUpdate { translation_x } => {
                let current = self.rotation.get();
                let start = *self.drag_start_rotation.get_or_insert(current);
                self.rotation.snap_to(start + translation_x * config.sensitivity);
                FlipOutcome::Tracking
            }
            GestureEvent::DragEnd {
                translation_x,
                velocity_x,
            } => {
                self.drag_start_rotation = None;
                let past_threshold = translation_x.abs() > config.commit_distance
                    || velocity_x.abs() > config.commit_velocity;
                let toward_other_side = if translation_x > 0.0 {
                    !self.is_flipped
                } else {
                    self.is_flipped
                };
                if past_threshold && toward_other_side {
                    self.toggle()
                } else {
                    self.settle_to(self.resting_face());
                    FlipOutcome::SnappedBack(self.resting_face())
                }
            }
            GestureEvent::DragCancel => {
                if self.drag_start_rotation.take().is_none() {
                    return FlipOutcome::Ignored;
                }
                self.settle_to(self.resting_face());
                FlipOutcome::SnappedBack(self.resting_face())
            }
        }
    }

    /// Advances the settle animation; returns true while still moving.
    pub fn step(&mut self, dt: Duration) -> bool {
        self.rotation.step(dt)
    }

    fn toggle(&mut self) -> FlipOutcome {
        self.is_flipped = !self.is_flipped;
        let face = self.resting_face();
        self.settle_to(face);
        FlipOutcome::Committed(face)
    }

    fn settle_to(&mut self, face: Face) {
        let target = face.rotation();
        if self.rotation.get() == target && self.rotation.velocity() == 0.0 {
            self.rotation.snap_to(target);
        } else {
            self.rotation.animate_to(target);
        }
    }
}

/// Render parameters for one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceStyle {
    /// Y-axis rotation in degrees.
    pub rotate_y: f32,
    pub opacity: f32,
    pub perspective: f32,
    /// False while the face's reverse side points at the viewer.
    pub backface_visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceStyles {
    pub front: FaceStyle,
    pub back: FaceStyle,
}

impl FaceStyles {
    pub fn get(&self, face: Face) -> &FaceStyle {
        match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
        }
    }
}

/// Face styles for a card at `rotation` degrees.
pub fn face_styles(rotation: f32, perspective: f32) -> FaceStyles {
    // Which side of the midpoint the card is on, for any number of turns.
    let turn = rotation.rem_euclid(360.0);
    let front_facing = turn < 90.0 || turn > 270.0;
    let back_facing = turn > 90.0 && turn < 270.0;

    FaceStyles {
        front: FaceStyle {
            rotate_y: rotation,
            opacity: interpolate(
                rotation,
                &OPACITY_STOPS,
                &FRONT_OPACITY,
                Extrapolation::CLAMP,
            ),
            perspective,
            backface_visible: front_facing,
        },
        back: FaceStyle {
            rotate_y: rotation - BACK_ROTATION,
            opacity: interpolate(
                rotation,
                &OPACITY_STOPS,
                &BACK_OPACITY,
                Extrapolation::CLAMP,
            ),
            perspective,
            backface_visible: back_facing,
        },
    }
}

pub struct FlipCard<C> {
    front: C,
    back: C,
    style: ContainerStyle,
    config: FlipConfig,
    state: Signal<FlipState>,
    detector: RefCell<FlipGestureDetector>,
    haptics: Rc<dyn HapticFeedback>,
    last_frame: Cell<Option<Instant>>,
}

impl<C> FlipCard<C> {
    pub fn new(
        props: FlipCardProps<C>,
        haptics: Rc<dyn HapticFeedback>,
    ) -> Result<Self, FlipCardError> {
        Self::with_config(props, FlipConfig::default(), haptics)
    }

    pub fn with_config(
        props: FlipCardProps<C>,
        config: FlipConfig,
        haptics: Rc<dyn HapticFeedback>,
    ) -> Result<Self, FlipCardError> {
        config.validate()?;

        let base = ContainerStyle {
            width: props.width,
            height: props.height,
            overflow: Some(Overflow::Hidden),
            ..ContainerStyle::default()
        };
        let style = match &props.style {
            Some(extra) => base.merge(extra),
            None => base,
        };
        if let Some(w) = &style.width {
            w.validate("width")?;
        }
        if let Some(h) = &style.height {
            h.validate("height")?;
        }

        Ok(Self {
            front: props.front,
            back: props.back,
            style,
            config,
            state: signal(FlipState::new(config.spring)),
            detector: RefCell::new(FlipGestureDetector::new(config.pan, config.tap)),
            haptics,
            last_frame: Cell::new(None),
        })
    }

    /// Shared handle to the card's state, for observers.
    pub fn state(&self) -> Signal<FlipState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> FlipState {
        self.state.get()
    }

    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    pub fn rotation(&self) -> f32 {
        self.state.with(|s| s.rotation())
    }

    pub fn is_flipped(&self) -> bool {
        self.state.with(|s| s.is_flipped())
    }

    pub fn phase(&self) -> FlipPhase {
        self.state.with(|s| s.phase())
    }

    /// Feeds one recognized gesture through the state machine.
    pub fn handle(&self, event: GestureEvent) -> FlipOutcome {
        let mut outcome = FlipOutcome::Ignored;
        self.state.update(|s| outcome = s.apply(event, &self.config));

        match outcome {
            FlipOutcome::Committed(face) => {
                log::debug!("flip committed to {face:?} on {event:?}");
                self.haptics.impact(self.config.haptic);
                // A new settle starts now, not at the last frame before it.
                self.last_frame.set(None);
            }
            FlipOutcome::SnappedBack(face) => {
                log::debug!("flip snapped back to {face:?} on {event:?}");
                self.last_frame.set(None);
            }
            FlipOutcome::Ignored => log::trace!("ignored {event:?}"),
            FlipOutcome::Tracking => {}
        }
        outcome
    }

    /// Runs a raw pointer event through the tap/pan recognizer.
    pub fn handle_pointer(&self, event: &PointerEvent) -> Vec<FlipOutcome> {
        let gestures = self.detector.borrow_mut().handle_pointer(event);
        gestures.into_iter().map(|g| self.handle(g)).collect()
    }

    /// True while this card's recognizer holds a pointer.
    pub fn is_tracking_pointer(&self) -> bool {
        self.detector.borrow().is_tracking()
    }

    /// Advances settling by `dt`; returns true while still animating.
    pub fn tick(&self, dt: Duration) -> bool {
        if !self.state.with(|s| s.rotation.is_animating()) {
            return false;
        }
        let mut animating = false;
        self.state.update(|s| animating = s.step(dt));
        animating
    }

    /// Advances settling by the time elapsed on the animation clock since the
    /// previous call.
    pub fn update(&self) -> bool {
        let now = now();
        let dt = self
            .last_frame
            .replace(Some(now))
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or(Duration::ZERO);
        self.tick(dt)
    }

    pub fn face_styles(&self) -> FaceStyles {
        face_styles(self.rotation(), self.config.perspective)
    }

    pub fn container_style(&self) -> &ContainerStyle {
        &self.style
    }

    /// Container size inside `parent`; missing dimensions fill the parent.
    pub fn size(&self, parent: Size) -> Size {
        Size {
            width: self
                .style
                .width
                .map_or(parent.width, |w| w.resolve(parent.width)),
            height: self
                .style
                .height
                .map_or(parent.height, |h| h.resolve(parent.height)),
        }
    }

    pub fn content(&self, face: Face) -> &C {
        match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
        }
    }

    /// Both faces in paint order with their current styles.
    pub fn faces(&self) -> [(Face, &C, FaceStyle); 2] {
        let styles = self.face_styles();
        [
            (Face::Front, &self.front, styles.front),
            (Face::Back, &self.back, styles.back),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::HapticRecorder;

    fn card() -> (FlipCard<&'static str>, HapticRecorder) {
        let rec = HapticRecorder::new();
        let card =
            FlipCard::new(FlipCardProps::new("front", "back"), Rc::new(rec.clone())).unwrap();
        (card, rec)
    }

    fn settle(card: &FlipCard<&'static str>) {
        let mut frames = 0;
        while card.tick(Duration::from_millis(16)) {
            frames += 1;
            assert!(frames < 1_000, "card never settled");
        }
    }

    fn drag(card: &FlipCard<&'static str>, translation_x: f32, velocity_x: f32) -> FlipOutcome {
        card.handle(GestureEvent::DragBegin);
        card.handle(GestureEvent::DragUpdate { translation_x });
        card.handle(GestureEvent::DragEnd {
            translation_x,
            velocity_x,
        })
    }

    fn flipped_card() -> (FlipCard<&'static str>, HapticRecorder) {
        let (card, rec) = card();
        card.handle(GestureEvent::Tap);
        settle(&card);
        rec.clear();
        (card, rec)
    }

    fn summary(card: &FlipCard<&'static str>) -> String {
        card.faces()
            .iter()
            .map(|(face, content, s)| {
                format!(
                    "{face:?} {content} rot={:.0} opacity={:.2} visible={}",
                    s.rotate_y, s.opacity, s.backface_visible
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_starts_resting_front() {
        let (card, _) = card();
        assert_eq!(card.phase(), FlipPhase::RestingFront);
        assert_eq!(card.rotation(), 0.0);
        assert!(!card.is_flipped());
    }

    #[test]
    fn test_two_taps_return_to_front() {
        let (card, rec) = card();
        assert_eq!(card.handle(GestureEvent::Tap), FlipOutcome::Committed(Face::Back));
        assert_eq!(card.phase(), FlipPhase::Settling);
        settle(&card);
        assert_eq!(card.phase(), FlipPhase::RestingBack);
        assert_eq!(card.rotation(), 180.0);

        assert_eq!(card.handle(GestureEvent::Tap), FlipOutcome::Committed(Face::Front));
        settle(&card);
        assert_eq!(card.phase(), FlipPhase::RestingFront);
        assert_eq!(card.rotation(), 0.0);
        assert!(!card.is_flipped());
        assert_eq!(rec.count(), 2);
    }

    #[test]
    fn test_tap_mid_settle_retargets() {
        let (card, rec) = card();
        card.handle(GestureEvent::Tap);
        card.tick(Duration::from_millis(100));
        card.handle(GestureEvent::Tap);
        settle(&card);
        assert_eq!(card.phase(), FlipPhase::RestingFront);
        assert_eq!(rec.count(), 2);
    }

    #[test]
    fn test_distance_threshold_boundary() {
        let (card, rec) = card();
        assert_eq!(drag(&card, 60.0, 0.0), FlipOutcome::SnappedBack(Face::Front));
        assert!(!card.is_flipped());
        settle(&card);
        assert_eq!(card.rotation(), 0.0);

        assert_eq!(drag(&card, 61.0, 0.0), FlipOutcome::Committed(Face::Back));
        assert!(card.is_flipped());
        assert_eq!(rec.count(), 1);
    }

    #[test]
    fn test_velocity_threshold_boundary() {
        let (card, rec) = card();
        assert_eq!(drag(&card, 10.0, 400.0), FlipOutcome::SnappedBack(Face::Front));
        assert!(!card.is_flipped());

        assert_eq!(drag(&card, 10.0, 401.0), FlipOutcome::Committed(Face::Back));
        assert!(card.is_flipped());
        assert_eq!(rec.count(), 1);
    }

    #[test]
    fn test_rightward_drag_from_back_snaps_back() {
        let (card, rec) = flipped_card();
        assert_eq!(card.phase(), FlipPhase::RestingBack);

        assert_eq!(drag(&card, 100.0, 0.0), FlipOutcome::SnappedBack(Face::Back));
        assert!(card.is_flipped());
        assert!((card.rotation() - 210.0).abs() < 1e-3);
        settle(&card);
        assert_eq!(card.rotation(), 180.0);
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn test_leftward_drag_from_back_flips_to_front() {
        let (card, rec) = flipped_card();
        assert_eq!(drag(&card, -100.0, -50.0), FlipOutcome::Committed(Face::Front));
        settle(&card);
        assert_eq!(card.phase(), FlipPhase::RestingFront);
        assert_eq!(rec.count(), 1);
    }

    #[test]
    fn test_leftward_fling_from_front_snaps_back() {
        let (card, rec) = card();
        assert_eq!(drag(&card, -80.0, -900.0), FlipOutcome::SnappedBack(Face::Front));
        assert!((card.rotation() + 24.0).abs() < 1e-3);
        settle(&card);
        assert_eq!(card.rotation(), 0.0);
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn test_haptic_once_per_commit_never_on_snap_back() {
        let (card, rec) = card();
        drag(&card, 20.0, 0.0);
        drag(&card, -200.0, 0.0);
        assert_eq!(rec.count(), 0);
        drag(&card, 200.0, 0.0);
        assert_eq!(rec.count(), 1);
        card.handle(GestureEvent::Tap);
        assert_eq!(rec.pulses(), vec![ImpactStyle::Light, ImpactStyle::Light]);
    }

    #[test]
    fn test_drag_tracks_without_clamp() {
        let (card, _) = card();
        card.handle(GestureEvent::DragBegin);
        assert_eq!(card.phase(), FlipPhase::Dragging);
        assert_eq!(card.snapshot().drag_start_rotation(), Some(0.0));

        card.handle(GestureEvent::DragUpdate { translation_x: 800.0 });
        assert!((card.rotation() - 240.0).abs() < 1e-3);
        card.handle(GestureEvent::DragUpdate { translation_x: -100.0 });
        assert!((card.rotation() + 30.0).abs() < 1e-3);
        assert_eq!(card.phase(), FlipPhase::Dragging);
    }

    #[test]
    fn test_drag_begin_mid_settle_captures_current_rotation() {
        let (card, _) = card();
        card.handle(GestureEvent::Tap);
        card.tick(Duration::from_millis(100));
        let mid = card.rotation();
        assert!(mid > 0.0 && mid < 180.0);

        card.handle(GestureEvent::DragBegin);
        card.handle(GestureEvent::DragUpdate { translation_x: 10.0 });
        assert!((card.rotation() - (mid + 3.0)).abs() < 1e-4);
        assert!(!card.tick(Duration::from_millis(16)));
    }

    #[test]
    fn test_tap_ignored_while_dragging() {
        let (card, rec) = card();
        card.handle(GestureEvent::DragBegin);
        assert_eq!(card.handle(GestureEvent::Tap), FlipOutcome::Ignored);
        assert!(!card.is_flipped());
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn test_drag_cancel_snaps_back_silently() {
        let (card, rec) = card();
        card.handle(GestureEvent::DragBegin);
        card.handle(GestureEvent::DragUpdate { translation_x: 300.0 });
        assert_eq!(card.handle(GestureEvent::DragCancel), FlipOutcome::SnappedBack(Face::Front));
        settle(&card);
        assert_eq!(card.phase(), FlipPhase::RestingFront);
        assert_eq!(rec.count(), 0);
        assert_eq!(card.handle(GestureEvent::DragCancel), FlipOutcome::Ignored);
    }

    #[test]
    fn test_release_without_movement_rests_immediately() {
        let (card, _) = card();
        card.handle(GestureEvent::DragBegin);
        card.handle(GestureEvent::DragEnd {
            translation_x: 0.0,
            velocity_x: 0.0,
        });
        assert_eq!(card.phase(), FlipPhase::RestingFront);
    }

    #[test]
    fn test_opacity_crossfade() {
        let at = |r| face_styles(r, 1000.0);
        assert_eq!((at(0.0).front.opacity, at(0.0).back.opacity), (1.0, 0.0));
        assert_eq!((at(180.0).front.opacity, at(180.0).back.opacity), (0.0, 1.0));
        assert_eq!((at(90.0).front.opacity, at(90.0).back.opacity), (0.0, 0.0));
        assert_eq!(at(-40.0).front.opacity, 1.0);
        assert_eq!(at(250.0).back.opacity, 1.0);
    }

    #[test]
    fn test_backface_visibility_follows_midpoint() {
        let s = face_styles(45.0, 1000.0);
        assert!(s.front.backface_visible && !s.back.backface_visible);
        let s = face_styles(135.0, 1000.0);
        assert!(!s.front.backface_visible && s.back.backface_visible);
        let s = face_styles(90.0, 1000.0);
        assert!(!s.front.backface_visible && !s.back.backface_visible);
        // Negative angles wrap around.
        assert!(face_styles(-10.0, 1000.0).front.backface_visible);
        assert!(face_styles(-100.0, 1000.0).back.backface_visible);
    }

    #[test]
    fn test_face_styles_snapshot() {
        let (card, _) = card();
        insta::assert_snapshot!(summary(&card), @r"
        Front front rot=0 opacity=1.00 visible=true
        Back back rot=-180 opacity=0.00 visible=false
        ");

        card.handle(GestureEvent::DragBegin);
        card.handle(GestureEvent::DragUpdate { translation_x: 150.0 });
        insta::assert_snapshot!(summary(&card), @r"
        Front front rot=45 opacity=0.50 visible=true
        Back back rot=-135 opacity=0.00 visible=false
        ");
    }

    #[test]
    fn test_pointer_drag_flips() {
        let (card, rec) = card();
        let at = |kind, x: f32, ms| {
            PointerEvent::touch(kind, Vec2::new(x, 100.0), Duration::from_millis(ms))
        };
        card.handle_pointer(&at(PointerEventKind::Down(PointerButton::Primary), 0.0, 0));
        card.handle_pointer(&at(PointerEventKind::Move, 20.0, 16));
        assert_eq!(card.phase(), FlipPhase::Dragging);
        assert!((card.rotation() - 6.0).abs() < 1e-3);
        card.handle_pointer(&at(PointerEventKind::Move, 90.0, 32));
        let out = card.handle_pointer(&at(PointerEventKind::Up(PointerButton::Primary), 90.0, 48));
        assert_eq!(out, vec![FlipOutcome::Committed(Face::Back)]);
        assert_eq!(rec.count(), 1);
    }

    #[test]
    fn test_pointer_short_drag_is_not_tap() {
        let (card, rec) = card();
        let at = |kind, x: f32, ms| {
            PointerEvent::touch(kind, Vec2::new(x, 0.0), Duration::from_millis(ms))
        };
        card.handle_pointer(&at(PointerEventKind::Down(PointerButton::Primary), 0.0, 0));
        card.handle_pointer(&at(PointerEventKind::Move, 20.0, 200));
        let out = card.handle_pointer(&at(PointerEventKind::Up(PointerButton::Primary), 20.0, 400));
        assert_eq!(out, vec![FlipOutcome::SnappedBack(Face::Front)]);
        assert!(!card.is_flipped());
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn test_observers_see_logical_side() {
        let (card, _) = card();
        let sides = Rc::new(RefCell::new(Vec::new()));
        card.state().subscribe({
            let sides = sides.clone();
            move |s: &FlipState| {
                let mut sides = sides.borrow_mut();
                if sides.last() != Some(&s.resting_face()) {
                    sides.push(s.resting_face());
                }
            }
        });
        card.handle(GestureEvent::Tap);
        settle(&card);
        card.handle(GestureEvent::Tap);
        assert_eq!(*sides.borrow(), vec![Face::Back, Face::Front]);
    }

    #[test]
    fn test_update_uses_animation_clock() {
        let clock = TestClock::new(Instant::now());
        set_clock(Box::new(clock.clone()));
        let (card, _) = card();
        card.handle(GestureEvent::Tap);
        assert!(card.update());
        for _ in 0..200 {
            clock.advance(Duration::from_millis(16));
            card.update();
        }
        assert_eq!(card.phase(), FlipPhase::RestingBack);
    }

    #[test]
    fn test_update_after_idle_starts_from_rest() {
        let clock = TestClock::new(Instant::now());
        set_clock(Box::new(clock.clone()));
        let (card, _) = card();
        assert!(!card.update());
        clock.advance(Duration::from_secs(5));

        card.handle(GestureEvent::Tap);
        assert!(card.update());
        assert_eq!(card.rotation(), 0.0);
        clock.advance(Duration::from_millis(16));
        assert!(card.update());
        let first_frame = card.rotation();
        assert!(first_frame > 0.0 && first_frame < 5.0, "rotation {first_frame}");

        while card.update() {
            clock.advance(Duration::from_millis(16));
        }
        clock.advance(Duration::from_secs(5));
        card.handle(GestureEvent::DragBegin);
        card.handle(GestureEvent::DragUpdate {
            translation_x: -100.0,
        });
        card.handle(GestureEvent::DragEnd {
            translation_x: -100.0,
            velocity_x: 0.0,
        });
        assert!(card.update());
        assert!((card.rotation() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_subscriber_can_read_card() {
        let card = Rc::new(card().0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        card.state().subscribe({
            let card = Rc::downgrade(&card);
            let seen = seen.clone();
            move |_: &FlipState| {
                if let Some(card) = card.upgrade() {
                    seen.borrow_mut().push((card.is_flipped(), card.phase()));
                }
            }
        });

        card.handle(GestureEvent::Tap);
        assert_eq!(seen.borrow()[0], (true, FlipPhase::Settling));
        settle(&card);
        assert_eq!(seen.borrow().last(), Some(&(true, FlipPhase::RestingBack)));
    }

    #[test]
    fn test_layout_and_style_merge() {
        let rec = HapticRecorder::new();
        let card = FlipCard::new(
            FlipCardProps::new((), ())
                .width(Dimension::Percent(50.0))
                .style(ContainerStyle {
                    corner_radius: Some(24.0),
                    height: Some(Dimension::Points(300.0)),
                    ..ContainerStyle::default()
                }),
            Rc::new(rec),
        )
        .unwrap();
        let size = card.size(Size {
            width: 400.0,
            height: 800.0,
        });
        assert_eq!(size, Size {
            width: 200.0,
            height: 300.0
        });
        let style = card.container_style();
        assert_eq!(style.overflow, Some(Overflow::Hidden));
        assert_eq!(style.corner_radius, Some(24.0));

        let fill =
            FlipCard::new(FlipCardProps::new((), ()), Rc::new(HapticRecorder::new())).unwrap();
        assert_eq!(fill.size(Size {
            width: 320.0,
            height: 480.0
        }), Size {
            width: 320.0,
            height: 480.0
        });
    }

    #[test]
    fn test_construction_validation() {
        let haptics: Rc<dyn HapticFeedback> = Rc::new(HapticRecorder::new());
        let err = FlipCard::new(
            FlipCardProps::new((), ()).width(Dimension::Points(-1.0)),
            haptics.clone(),
        )
        .err();
        assert_eq!(err, Some(FlipCardError::InvalidDimension {
            axis: "width",
            value: -1.0
        }));

        let err = FlipCard::with_config(
            FlipCardProps::new((), ()),
            FlipConfig::default().spring(SpringSpec::new(20.0, 0.0)),
            haptics.clone(),
        )
        .err();
        assert_eq!(err, Some(FlipCardError::Spring(SpringError::Stiffness(0.0))));

        let err = FlipCard::with_config(
            FlipCardProps::new((), ()),
            FlipConfig::default().commit_thresholds(f32::NAN, 400.0),
            haptics,
        )
        .err();
        assert!(matches!(
            err,
            Some(FlipCardError::InvalidThreshold {
                name: "commit_distance",
                ..
            })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = FlipConfig::default().haptic(ImpactStyle::Medium);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: FlipConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
