//! Leapfrog stepping with a Boris-type impulse for magnetic charges,
//! and error estimation through step doubling.

use super::fpr;
use crate::{
    constants::C_SQUARED,
    field::sampler::FieldSampler,
    geometry::{Point3, Vec3},
};

/// Position and (not necessarily normalized) direction of a particle
/// during a trial step.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialState {
    pub position: Point3<fpr>,
    pub direction: Vec3<fpr>,
}

impl TrialState {
    pub fn new(position: Point3<fpr>, direction: Vec3<fpr>) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// Particle properties held fixed during one propagation call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PushParameters {
    /// Redshift at which the field is sampled.
    pub redshift: fpr,
    /// Mass entering the impulse [kg].
    pub mass: fpr,
    /// Magnetic charge [A m].
    pub magnetic_charge: fpr,
    /// Whether to restore the direction to unit length after every impulse.
    pub renormalize_substeps: bool,
}

/// Outcome of one full step compared with two half steps.
#[derive(Clone, Debug, PartialEq)]
pub struct StepTrial {
    /// Result of a single step of the full length.
    pub accepted: TrialState,
    /// Result of two consecutive steps of half the length.
    pub comparison: TrialState,
    /// Estimated relative local error of the position.
    pub error: fpr,
}

impl StepTrial {
    /// Magnitude of the error estimate when attributed equally to all
    /// three direction components.
    pub fn direction_error(&self) -> fpr {
        Vec3::equal_components(self.error).length()
    }
}

/// Advances trial states through a magnetic field.
#[derive(Clone, Debug)]
pub struct BorisPusher<'a> {
    sampler: &'a FieldSampler,
    parameters: PushParameters,
}

impl<'a> BorisPusher<'a> {
    pub fn new(sampler: &'a FieldSampler, parameters: PushParameters) -> Self {
        Self {
            sampler,
            parameters,
        }
    }

    pub fn parameters(&self) -> &PushParameters {
        &self.parameters
    }

    /// Performs a single step of the given length.
    ///
    /// The position is advanced by half a step, the direction receives
    /// the impulse `g B h / (m c^2)` from the field at the midpoint, and
    /// the position is advanced by the second half step with the new
    /// direction. The direction magnitude is left to drift unless
    /// `renormalize_substeps` is set.
    pub fn advance(&self, state: &TrialState, step: fpr) -> TrialState {
        let half_step = 0.5 * step;
        let midpoint = &state.position + &(&state.direction * half_step);

        let field = self.sampler.sample(&midpoint, self.parameters.redshift);
        let impulse_scale =
            self.parameters.magnetic_charge * step / self.parameters.mass / C_SQUARED;
        let mut direction = &state.direction + &(&field * impulse_scale);

        if self.parameters.renormalize_substeps {
            let length = state.direction.length();
            if let Some(unit_direction) = direction.normalized() {
                direction = unit_direction * length;
            }
        }

        let position = &midpoint + &(&direction * half_step);
        TrialState::new(position, direction)
    }

    /// Performs one full step and two half steps from the same state and
    /// estimates the error from the difference in end positions.
    pub fn try_step(&self, state: &TrialState, step: fpr) -> StepTrial {
        let accepted = self.advance(state, step);

        let halfway = self.advance(state, 0.5 * step);
        let comparison = self.advance(&halfway, 0.5 * step);

        let error = estimate_error(&accepted.position, &comparison.position, step);
        StepTrial {
            accepted,
            comparison,
            error,
        }
    }
}

/// Estimates the relative local error of a step of the given length from
/// the end position of one full step and of two half steps.
///
/// The position difference is divided by `1 - (1/2)^2`, the error
/// reduction expected when halving the step of a second-order scheme.
pub fn estimate_error(full_step_position: &Point3<fpr>, half_steps_position: &Point3<fpr>, step: fpr) -> fpr {
    if step == 0.0 {
        return 0.0;
    }
    let difference = full_step_position - half_steps_position;
    difference.length() / (fpr::abs(step) * (1.0 - 1.0 / 4.0))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        field::{
            single_mode::{
                PolarizationConvention, PolarizationMode, PolarizedSingleModeMagneticField,
                StrengthNormalization,
            },
            uniform::UniformMagneticField,
        },
        units::KPC,
    };
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn parameters(magnetic_charge: fpr) -> PushParameters {
        PushParameters {
            redshift: 0.0,
            mass: 1.0 / C_SQUARED,
            magnetic_charge,
            renormalize_substeps: false,
        }
    }

    fn helical_sampler() -> FieldSampler {
        FieldSampler::new(Arc::new(
            PolarizedSingleModeMagneticField::new(
                1e-9,
                KPC,
                1.0,
                Point3::origin(),
                &Vec3::new(1.0, 0.0, 0.0),
                &Vec3::new(0.0, 1.0, 0.0),
                StrengthNormalization::Amplitude,
                PolarizationConvention::Helicity,
                PolarizationMode::Circular,
            )
            .unwrap(),
        ))
    }

    #[test]
    fn zero_field_gives_straight_line() {
        let sampler = FieldSampler::absent();
        let pusher = BorisPusher::new(&sampler, parameters(1.0));
        let state = TrialState::new(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0));
        let advanced = pusher.advance(&state, 4.0);
        assert_eq!(advanced.position, Point3::new(1.0, 6.0, 3.0));
        assert_eq!(advanced.direction, state.direction);
    }

    #[test]
    fn impulse_follows_field_and_drifts_in_magnitude() {
        let sampler = FieldSampler::new(Arc::new(UniformMagneticField::new(Vec3::new(
            0.0, 0.0, 0.5,
        ))));
        let pusher = BorisPusher::new(&sampler, parameters(1.0));
        let state = TrialState::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        let advanced = pusher.advance(&state, 2.0);

        // Kick is g B h / (m c^2) = 0.5 * 2 with unit energy
        assert_abs_diff_eq!(advanced.direction[crate::geometry::Dim3::Z], 1.0, epsilon = 1e-12);
        assert!(advanced.direction.length() > 1.0);

        let renormalizing = BorisPusher::new(
            &sampler,
            PushParameters {
                renormalize_substeps: true,
                ..parameters(1.0)
            },
        );
        let advanced = renormalizing.advance(&state, 2.0);
        assert_abs_diff_eq!(advanced.direction.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn uniform_field_has_negligible_error_estimate() {
        let sampler = FieldSampler::new(Arc::new(UniformMagneticField::new(Vec3::new(
            0.0, 0.0, 1e-3,
        ))));
        let pusher = BorisPusher::new(&sampler, parameters(1.0));
        let state = TrialState::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        let trial = pusher.try_step(&state, 10.0);
        assert!(trial.error < 1e-12);
    }

    #[test]
    fn advancing_is_deterministic() {
        let sampler = helical_sampler();
        let pusher = BorisPusher::new(&sampler, parameters(3e-9 * 1e18));
        let state = TrialState::new(
            Point3::new(0.1 * KPC, -0.3 * KPC, 0.7 * KPC),
            Vec3::new(0.6, 0.0, 0.8),
        );
        let first = pusher.advance(&state, 0.05 * KPC);
        let second = pusher.advance(&state, 0.05 * KPC);
        assert_eq!(first, second);
    }

    #[test]
    fn error_estimate_decreases_with_step_length() {
        let sampler = helical_sampler();
        let pusher = BorisPusher::new(&sampler, parameters(3e-9 * 1e18));
        let state = TrialState::new(Point3::origin(), Vec3::new(0.0, 0.6, 0.8));
        let coarse = pusher.try_step(&state, 0.1 * KPC);
        let fine = pusher.try_step(&state, 0.01 * KPC);
        assert!(coarse.error > 0.0);
        assert!(fine.error < coarse.error);
        assert_abs_diff_eq!(
            coarse.direction_error(),
            fpr::sqrt(3.0) * coarse.error,
            epsilon = 1e-12 * coarse.error
        );
    }

    #[test]
    fn zero_step_has_zero_error() {
        assert_eq!(
            estimate_error(&Point3::origin(), &Point3::new(1.0, 0.0, 0.0), 0.0),
            0.0
        );
    }
}
