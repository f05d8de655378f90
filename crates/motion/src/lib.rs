//! Motion primitives: spring smoothing, clamped linear mapping, easing curves.
//!
//! # Invariants
//! - Everything here is a pure numeric filter; no clocks, no host types.
//! - Springs advance only through `step`, by the delta the caller supplies.
//! - Range maps clamp at the domain edges instead of extrapolating.

mod easing;
mod map;
mod spring;

pub use easing::{CubicBezier, Easing, Tween};
pub use map::LinearMap;
pub use spring::{Spring, SpringConfig, SpringValue};

/// Errors from constructing motion primitives with unusable parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    #[error("input range [{0}, {1}] is degenerate")]
    DegenerateRange(f32, f32),
    #[error("spring {field} must be {expected}, got {value}")]
    InvalidSpring {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}
