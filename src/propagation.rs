//! Propagation of particles through magnetic fields.

pub mod adaptive;
pub mod boris;
pub mod rectilinear;

use crate::{
    error::{ConfigError, ConfigResult},
    num,
    units::KPC,
};
use std::fmt;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Floating-point precision to use for propagation.
#[allow(non_camel_case_types)]
pub type fpr = f64;

/// Validated lower and upper limits on the propagation step length.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct StepBounds {
    min_step: fpr,
    max_step: fpr,
}

impl StepBounds {
    /// Creates new step bounds [m].
    ///
    /// # Returns
    ///
    /// A `ConfigResult` which is an error unless `0 <= min_step <= max_step`
    /// and both are finite.
    pub fn new(min_step: fpr, max_step: fpr) -> ConfigResult<Self> {
        Self::validate(min_step, max_step)?;
        Ok(Self { min_step, max_step })
    }

    /// Creates bounds that only allow the given step length.
    pub fn fixed(step: fpr) -> ConfigResult<Self> {
        Self::new(step, step)
    }

    fn validate(min_step: fpr, max_step: fpr) -> ConfigResult<()> {
        if !min_step.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "Minimum step",
                value: min_step,
            });
        }
        if !max_step.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "Maximum step",
                value: max_step,
            });
        }
        if min_step < 0.0 {
            return Err(ConfigError::NegativeMinimumStep(min_step));
        }
        if min_step > max_step {
            return Err(ConfigError::MinimumStepExceedsMaximum { min_step, max_step });
        }
        Ok(())
    }

    pub fn min_step(&self) -> fpr {
        self.min_step
    }

    pub fn max_step(&self) -> fpr {
        self.max_step
    }

    /// Changes the minimum step, keeping the bounds unchanged on error.
    pub fn set_min_step(&mut self, min_step: fpr) -> ConfigResult<()> {
        Self::validate(min_step, self.max_step)?;
        self.min_step = min_step;
        Ok(())
    }

    /// Changes the maximum step, keeping the bounds unchanged on error.
    pub fn set_max_step(&mut self, max_step: fpr) -> ConfigResult<()> {
        Self::validate(self.min_step, max_step)?;
        self.max_step = max_step;
        Ok(())
    }

    /// Whether only a single step length is allowed.
    #[allow(clippy::float_cmp)]
    pub fn is_fixed(&self) -> bool {
        self.min_step == self.max_step
    }

    /// Restricts the given step length to the bounds.
    pub fn clamp(&self, step: fpr) -> fpr {
        num::clip(step, self.min_step, self.max_step)
    }
}

impl fmt::Display for StepBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Minimum Step: {} kpc, Maximum Step: {} kpc",
            self.min_step / KPC,
            self.max_step / KPC
        )
    }
}
