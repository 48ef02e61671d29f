//! Piecewise-linear interpolation between breakpoints.
//!
//! `interpolate(value, input, output, extrapolation)` finds the segment of
//! `input` that contains `value` and maps it linearly onto the matching
//! segment of `output`. Outside the first and last breakpoints each side
//! follows its own `Extrapolate` rule.

use smallvec::SmallVec;

use crate::error::InterpolateError;

/// What happens to a value beyond one end of the breakpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolate {
    /// Keep following the end segment's slope.
    #[default]
    Extend,
    /// Hold the end output.
    Clamp,
    /// Return the input value unchanged.
    Identity,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extrapolation {
    pub left: Extrapolate,
    pub right: Extrapolate,
}

impl Extrapolation {
    pub const EXTEND: Extrapolation = Extrapolation::both(Extrapolate::Extend);
    pub const CLAMP: Extrapolation = Extrapolation::both(Extrapolate::Clamp);
    pub const IDENTITY: Extrapolation = Extrapolation::both(Extrapolate::Identity);
    /// Extend below the first breakpoint, clamp above the last.
    pub const CLAMP_RIGHT: Extrapolation = Extrapolation {
        left: Extrapolate::Extend,
        right: Extrapolate::Clamp,
    };
    /// Clamp below the first breakpoint, extend above the last.
    pub const CLAMP_LEFT: Extrapolation = Extrapolation {
        left: Extrapolate::Clamp,
        right: Extrapolate::Extend,
    };

    pub const fn both(e: Extrapolate) -> Self {
        Self { left: e, right: e }
    }
}

/// Maps `value` through fixed breakpoints.
///
/// `input` is expected to be ascending. With zero breakpoints the value is
/// returned as-is; with one, its output is returned.
pub fn interpolate<const N: usize>(
    value: f32,
    input: &[f32; N],
    output: &[f32; N],
    extrapolation: Extrapolation,
) -> f32 {
    match N {
        0 => value,
        1 => output[0],
        _ => sample(value, input, output, extrapolation),
    }
}

/// Validated breakpoints built at runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    input: SmallVec<[f32; 4]>,
    output: SmallVec<[f32; 4]>,
    extrapolation: Extrapolation,
}

impl Curve {
    pub fn new(input: &[f32], output: &[f32]) -> Result<Self, InterpolateError> {
        if input.len() != output.len() {
            return Err(InterpolateError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        if input.len() < 2 {
            return Err(InterpolateError::TooFewBreakpoints(input.len()));
        }
        if let Some(index) = input.iter().position(|v| !v.is_finite()) {
            return Err(InterpolateError::NotAscending { index });
        }
        if let Some(index) = input.windows(2).position(|w| w[1] < w[0]) {
            return Err(InterpolateError::NotAscending { index: index + 1 });
        }
        Ok(Self {
            input: input.iter().copied().collect(),
            output: output.iter().copied().collect(),
            extrapolation: Extrapolation::EXTEND,
        })
    }

    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn sample(&self, value: f32) -> f32 {
        sample(value, &self.input, &self.output, self.extrapolation)
    }
}

/// Requires `input.len() == output.len() >= 2`.
fn sample(value: f32, input: &[f32], output: &[f32], extrapolation: Extrapolation) -> f32 {
    let last = input.len() - 1;

    // Segment whose left edge is the last breakpoint <= value, limited to the
    // first and last segments for values outside the range.
    let seg = input[1..last]
        .iter()
        .take_while(|&&edge| value >= edge)
        .count();

    let (x0, x1) = (input[seg], input[seg + 1]);
    let (y0, y1) = (output[seg], output[seg + 1]);

    if value < input[0] {
        match extrapolation.left {
            Extrapolate::Clamp => return output[0],
            Extrapolate::Identity => return value,
            Extrapolate::Extend => {}
        }
    } else if value > input[last] {
        match extrapolation.right {
            Extrapolate::Clamp => return output[last],
            Extrapolate::Identity => return value,
            Extrapolate::Extend => {}
        }
    }

    let span = x1 - x0;
    if span == 0.0 {
        return if value <= x0 { y0 } else { y1 };
    }
    y0 + (value - x0) / span * (y1 - y0)
}
