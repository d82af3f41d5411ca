//! Restriction of a field to a finite box.

use super::{FieldError, MagneticField};
use crate::{
    error::{ConfigError, ConfigResult},
    geometry::{Dim3, Point3, Vec3},
    propagation::fpr,
};
use std::sync::Arc;

/// Wraps a field so that it is only defined inside an axis-aligned box.
/// Sampling outside the box fails with `FieldError::OutOfBounds`.
#[derive(Clone)]
pub struct BoundedMagneticField {
    inner: Arc<dyn MagneticField>,
    lower_bounds: Point3<fpr>,
    upper_bounds: Point3<fpr>,
}

impl BoundedMagneticField {
    pub fn new(
        inner: Arc<dyn MagneticField>,
        lower_bounds: Point3<fpr>,
        upper_bounds: Point3<fpr>,
    ) -> ConfigResult<Self> {
        if Dim3::slice()
            .iter()
            .any(|&dim| !(lower_bounds[dim] < upper_bounds[dim]))
        {
            return Err(ConfigError::InvalidField(format!(
                "lower bounds {} must be below upper bounds {}",
                lower_bounds, upper_bounds
            )));
        }
        Ok(Self {
            inner,
            lower_bounds,
            upper_bounds,
        })
    }

    /// Whether the given position lies inside the box (inclusive).
    pub fn contains(&self, position: &Point3<fpr>) -> bool {
        Dim3::slice().iter().all(|&dim| {
            position[dim] >= self.lower_bounds[dim] && position[dim] <= self.upper_bounds[dim]
        })
    }
}

impl MagneticField for BoundedMagneticField {
    fn field(&self, position: &Point3<fpr>, redshift: fpr) -> Result<Vec3<fpr>, FieldError> {
        if self.contains(position) {
            self.inner.field(position, redshift)
        } else {
            Err(FieldError::OutOfBounds(position.clone()))
        }
    }

    fn description(&self) -> String {
        format!(
            "{} restricted to [{}, {}]",
            self.inner.description(),
            self.lower_bounds,
            self.upper_bounds
        )
    }
}
