//! # Springs, Curves, and Signals
//!
//! Flipdeck's core is a small set of headless animation primitives. The host
//! owns rendering and the frame loop; everything here only turns inputs and
//! elapsed time into numbers a renderer can consume.
//!
//! - `Signal<T>`: observable shared cell, the single accessor for widget state.
//! - `interpolate` / `Curve`: piecewise-linear mapping with per-side extrapolation.
//! - `SpringValue`: physical spring that settles a value onto a target.
//! - `AnimatedValue<T>`: duration-based tween driven by the global clock.
//!
//! ## Signals
//!
//! ```rust
//! use flipdeck_core::*;
//!
//! let rotation = signal(0.0f32);
//! rotation.set(90.0);
//! rotation.update(|r| *r += 90.0);
//! assert_eq!(rotation.get(), 180.0);
//! ```
//!
//! ## Interpolation
//!
//! Breakpoints are given as fixed-size arrays so input and output always have
//! the same length:
//!
//! ```rust
//! use flipdeck_core::*;
//!
//! let opacity = interpolate(45.0, &[0.0, 90.0, 180.0], &[1.0, 0.0, 0.0], Extrapolation::CLAMP);
//! assert!((opacity - 0.5).abs() < 1e-6);
//! ```
//!
//! Curves assembled at runtime go through `Curve::new`, which validates them
//! once and reports an `InterpolateError` instead of misbehaving later.
//!
//! ## Springs
//!
//! ```rust
//! use flipdeck_core::*;
//! use web_time::Duration;
//!
//! let mut s = SpringValue::new(0.0, SpringSpec::new(20.0, 90.0));
//! s.animate_to(180.0);
//! while s.step(Duration::from_millis(16)) {}
//! assert_eq!(s.get(), 180.0);
//! ```

pub mod animation;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interpolate;
pub mod prelude;
pub mod signal;

pub use animation::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use interpolate::*;
pub use signal::*;
