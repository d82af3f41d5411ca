//! Magnetic field providers and sampling.

pub mod bounded;
pub mod sampler;
pub mod single_mode;
pub mod uniform;

use crate::{
    geometry::{Point3, Vec3},
    propagation::fpr,
};
use thiserror::Error;

/// Reasons a field provider could not produce a field vector.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum FieldError {
    #[error("position {0} is outside the field domain")]
    OutOfBounds(Point3<fpr>),

    #[error("field evaluation failed: {0}")]
    Evaluation(String),
}

/// Defines the properties of a magnetic field provider.
///
/// Providers are shared read-only between propagation threads.
pub trait MagneticField: Send + Sync {
    /// Computes the magnetic field [T] at the given comoving position
    /// and redshift.
    fn field(&self, position: &Point3<fpr>, redshift: fpr) -> Result<Vec3<fpr>, FieldError>;

    /// Returns a short human-readable description of the field.
    fn description(&self) -> String;
}
