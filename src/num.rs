//! Utilities related to numbers.

use num;
use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat: Sync + Send + num::Float + num::cast::FromPrimitive + fmt::Debug {}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Restricts a value to the closed interval `[lower, upper]`.
///
/// Unlike `f64::clamp`, this does not panic when the bounds are
/// inverted; the lower bound wins in that case.
pub fn clip<F: BFloat>(value: F, lower: F, upper: F) -> F {
    F::max(lower, F::min(value, upper))
}
