use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::error::SpringError;

thread_local! {
    static CLOCK: RefCell<Option<Box<dyn Clock>>> = const { RefCell::new(None) };
}

/// Current time according to this thread's animation clock.
pub fn now() -> Instant {
    CLOCK
        .with(|c| c.borrow().as_ref().map(|c| c.now()))
        .unwrap_or_else(Instant::now)
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    pub fn fast() -> Self {
        Self {
            duration: Duration::from_millis(150),
            easing: Easing::EaseOut,
            delay: Duration::ZERO,
        }
    }

    pub fn slow() -> Self {
        Self {
            duration: Duration::from_millis(600),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for crate::Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        crate::Vec2 {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
        }
    }
}

// Animation clock
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Install the animation clock for the current thread. Without one, `now()`
/// reads the system clock; tests install a `TestClock`.
pub fn set_clock(clock: Box<dyn Clock>) {
    CLOCK.with(|c| *c.borrow_mut() = Some(clock));
}

/// A test clock you can drive deterministically. Clones share the same time.
#[derive(Clone)]
pub struct TestClock {
    t: Rc<Cell<Instant>>,
}

impl TestClock {
    pub fn new(t: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.t.set(self.t.get() + d);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Animated value that transitions smoothly
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    target: T,
    start: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            spec,
            start_time: None,
        }
    }

    /// Retargets from wherever the value currently is.
    pub fn set_target(&mut self, target: T) {
        self.start = self.current.clone();
        self.target = target;
        self.start_time = Some(now());
    }

    /// Jumps to `value` and cancels any running transition.
    pub fn snap_to(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.start_time = None;
    }

    pub fn update(&mut self) -> bool {
        if let Some(start) = self.start_time {
            let elapsed = now().saturating_duration_since(start);

            if elapsed < self.spec.delay {
                return true; // Still waiting for delay
            }

            let animation_time = elapsed - self.spec.delay;

            if animation_time >= self.spec.duration {
                self.current = self.target.clone();
                self.start_time = None;
                return false;
            }

            let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
            let eased_t = self.spec.easing.interpolate(t);
            self.current = self.start.interpolate(&self.target, eased_t);

            true
        } else {
            false
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Integration substep for springs.
const SPRING_SUBSTEP: f32 = 0.001;
/// Longest frame a spring will integrate in one call; longer gaps are dropped.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Physical spring parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringSpec {
    pub damping: f32,
    pub stiffness: f32,
    pub mass: f32,
    /// Distance from the target below which the spring may rest.
    pub rest_displacement: f32,
    /// Speed (units/s) below which the spring may rest.
    pub rest_speed: f32,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SpringSpec {
    pub const DEFAULT: SpringSpec = SpringSpec {
        damping: 10.0,
        stiffness: 100.0,
        mass: 1.0,
        rest_displacement: 0.01,
        rest_speed: 2.0,
    };

    pub const fn new(damping: f32, stiffness: f32) -> Self {
        Self {
            damping,
            stiffness,
            ..Self::DEFAULT
        }
    }

    pub const fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub const fn with_rest(mut self, displacement: f32, speed: f32) -> Self {
        self.rest_displacement = displacement;
        self.rest_speed = speed;
        self
    }

    /// Damping ratio; below 1 the spring overshoots its target.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    pub fn validate(&self) -> Result<(), SpringError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SpringError::Mass(self.mass));
        }
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(SpringError::Stiffness(self.stiffness));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(SpringError::Damping(self.damping));
        }
        if !(self.rest_displacement.is_finite() && self.rest_displacement > 0.0)
            || !(self.rest_speed.is_finite() && self.rest_speed > 0.0)
        {
            return Err(SpringError::RestThreshold);
        }
        Ok(())
    }
}

/// A scalar driven by a damped spring toward an optional target.
///
/// While no target is set the value is at rest and only changes through
/// `snap_to`. Setting a target keeps the current velocity, so retargeting
/// mid-flight stays continuous.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringValue {
    value: f32,
    velocity: f32,
    target: Option<f32>,
    spec: SpringSpec,
}

impl SpringValue {
    pub fn new(initial: f32, spec: SpringSpec) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            target: None,
            spec,
        }
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> Option<f32> {
        self.target
    }

    pub fn spec(&self) -> &SpringSpec {
        &self.spec
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    pub fn animate_to(&mut self, target: f32) {
        self.target = Some(target);
    }

    /// Sets the value directly, stopping any animation.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
        self.target = None;
    }

    /// Advances the spring by `dt`; returns true while still animating.
    pub fn step(&mut self, dt: Duration) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        let SpringSpec {
            damping,
            stiffness,
            mass,
            rest_displacement,
            rest_speed,
        } = self.spec;

        if dt > MAX_FRAME_DELTA {
            log::debug!("spring frame of {dt:?} capped to {MAX_FRAME_DELTA:?}");
        }
        let mut remaining = dt.min(MAX_FRAME_DELTA).as_secs_f32();
        while remaining > 0.0 {
            let h = remaining.min(SPRING_SUBSTEP);
            let accel = (-stiffness * (self.value - target) - damping * self.velocity) / mass;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - target).abs() < rest_displacement && self.velocity.abs() < rest_speed {
            self.value = target;
            self.velocity = 0.0;
            self.target = None;
            return false;
        }
        true
    }
}
