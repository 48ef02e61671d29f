pub use crate::animation::*;
pub use crate::error::*;
pub use crate::geometry::{Rect, Size, Transform, Vec2};
pub use crate::input::*;
pub use crate::interpolate::{Curve, Extrapolate, Extrapolation, interpolate};
pub use crate::signal::{Signal, signal};
