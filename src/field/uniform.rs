//! Homogeneous magnetic field.

use super::{FieldError, MagneticField};
use crate::{
    geometry::{Point3, Vec3},
    propagation::fpr,
    units::NANO_GAUSS,
};

/// A magnetic field with the same vector everywhere.
#[derive(Clone, Debug)]
pub struct UniformMagneticField {
    value: Vec3<fpr>,
}

impl UniformMagneticField {
    /// Creates a new uniform field with the given field vector [T].
    pub fn new(value: Vec3<fpr>) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Vec3<fpr> {
        &self.value
    }
}

impl MagneticField for UniformMagneticField {
    fn field(&self, _position: &Point3<fpr>, _redshift: fpr) -> Result<Vec3<fpr>, FieldError> {
        Ok(self.value.clone())
    }

    fn description(&self) -> String {
        format!("Uniform magnetic field B = {} nG", &self.value / NANO_GAUSS)
    }
}
