//! Failure-tolerant access to a shared magnetic field.

use super::MagneticField;
use crate::{
    geometry::{Point3, Vec3},
    propagation::fpr,
};
use atomic_counter::{AtomicCounter, RelaxedCounter};
use std::{fmt, sync::Arc};

/// Handle to an optional shared field provider.
///
/// Sampling never fails: an absent provider or a provider error both
/// yield the zero vector. Provider errors are counted and, unless
/// reporting is disabled, printed as warnings.
pub struct FieldSampler {
    field: Option<Arc<dyn MagneticField>>,
    report_failures: bool,
    n_failures: Arc<RelaxedCounter>,
}

impl FieldSampler {
    /// Creates a sampler for the given field provider.
    pub fn new(field: Arc<dyn MagneticField>) -> Self {
        Self {
            field: Some(field),
            report_failures: true,
            n_failures: Arc::new(RelaxedCounter::new(0)),
        }
    }

    /// Creates a sampler without a field provider, which always
    /// samples the zero vector.
    pub fn absent() -> Self {
        Self {
            field: None,
            report_failures: true,
            n_failures: Arc::new(RelaxedCounter::new(0)),
        }
    }

    /// Sets whether sampling failures should be printed as warnings.
    pub fn with_failure_reporting(mut self, report_failures: bool) -> Self {
        self.report_failures = report_failures;
        self
    }

    /// Whether a field provider is present.
    pub fn is_valid(&self) -> bool {
        self.field.is_some()
    }

    /// Returns the shared field provider, if present.
    pub fn field(&self) -> Option<&Arc<dyn MagneticField>> {
        self.field.as_ref()
    }

    /// Number of failed samplings so far, including those of clones
    /// sharing this sampler's counter.
    pub fn n_failures(&self) -> usize {
        self.n_failures.get()
    }

    /// Samples the field [T] at the given position and redshift.
    pub fn sample(&self, position: &Point3<fpr>, redshift: fpr) -> Vec3<fpr> {
        match &self.field {
            Some(field) => match field.field(position, redshift) {
                Ok(value) => value,
                Err(err) => {
                    self.n_failures.inc();
                    if self.report_failures {
                        eprintln!("Warning: Using zero magnetic field: {}", err);
                    }
                    Vec3::zero()
                }
            },
            None => Vec3::zero(),
        }
    }

    /// Returns a short human-readable description of the sampled field.
    pub fn description(&self) -> String {
        match &self.field {
            Some(field) => field.description(),
            None => "No magnetic field".to_string(),
        }
    }
}

impl Clone for FieldSampler {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            report_failures: self.report_failures,
            n_failures: Arc::clone(&self.n_failures),
        }
    }
}

impl fmt::Debug for FieldSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSampler")
            .field("field", &self.description())
            .field("report_failures", &self.report_failures)
            .field("n_failures", &self.n_failures())
            .finish()
    }
}
