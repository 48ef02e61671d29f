use flipdeck_core::SpringError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlipCardError {
    #[error("{axis} must be a finite, non-negative size, got {value}")]
    InvalidDimension { axis: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("invalid flip spring: {0}")]
    Spring(#[from] SpringError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CarouselError {
    #[error("page size must be positive and finite, got {0}")]
    InvalidPageSize(f32),
}
