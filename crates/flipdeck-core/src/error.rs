use thiserror::Error;

/// Rejected interpolation breakpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolateError {
    #[error("interpolation needs at least two breakpoints, got {0}")]
    TooFewBreakpoints(usize),
    #[error("input has {input} breakpoints but output has {output}")]
    LengthMismatch { input: usize, output: usize },
    #[error("input breakpoints must be finite and ascending (index {index})")]
    NotAscending { index: usize },
}

/// Rejected spring parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpringError {
    #[error("spring mass must be positive and finite, got {0}")]
    Mass(f32),
    #[error("spring stiffness must be positive and finite, got {0}")]
    Stiffness(f32),
    #[error("spring damping must be non-negative and finite, got {0}")]
    Damping(f32),
    #[error("spring rest thresholds must be positive and finite")]
    RestThreshold,
}
