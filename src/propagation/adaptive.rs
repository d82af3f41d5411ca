//! Propagation of magnetic monopoles with the Boris push and
//! step size adaptation driven by step-doubling error estimates.

use super::{
    boris::{BorisPusher, PushParameters, StepTrial, TrialState},
    fpr, StepBounds,
};
use crate::{
    constants::C_SQUARED,
    error::{ConfigError, ConfigResult},
    field::sampler::FieldSampler,
    particle::candidate::Candidate,
    simulation::Module,
    units::KPC,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Configuration parameters for the monopole propagator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct MonopolePropagatorConfig {
    /// Target relative error, in the range (0, 1].
    pub tolerance: fpr,
    /// Smallest allowed step length [m].
    pub min_step: fpr,
    /// Largest allowed step length [m].
    pub max_step: fpr,
    /// Whether to restore the direction magnitude after every impulse
    /// instead of only after an accepted step.
    pub renormalize_substeps: bool,
}

impl MonopolePropagatorConfig {
    pub const DEFAULT_TOLERANCE: fpr = 1e-4;
    pub const DEFAULT_MIN_STEP: fpr = 0.1 * KPC;
    pub const DEFAULT_MAX_STEP: fpr = 1.0 * KPC;
    pub const DEFAULT_FIXED_STEP_TOLERANCE: fpr = 0.42;
    pub const DEFAULT_RENORMALIZE_SUBSTEPS: bool = false;

    /// Configuration for propagation with a single fixed step length.
    pub fn fixed_step(step: fpr) -> Self {
        Self {
            tolerance: Self::DEFAULT_FIXED_STEP_TOLERANCE,
            min_step: step,
            max_step: step,
            renormalize_substeps: Self::DEFAULT_RENORMALIZE_SUBSTEPS,
        }
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tolerance(self.tolerance)?;
        StepBounds::new(self.min_step, self.max_step)?;
        Ok(())
    }
}

impl Default for MonopolePropagatorConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            min_step: Self::DEFAULT_MIN_STEP,
            max_step: Self::DEFAULT_MAX_STEP,
            renormalize_substeps: Self::DEFAULT_RENORMALIZE_SUBSTEPS,
        }
    }
}

fn validate_tolerance(tolerance: fpr) -> ConfigResult<()> {
    if tolerance > 0.0 && tolerance <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ToleranceOutOfRange(tolerance))
    }
}

/// Result of the step size control for one propagation call.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlledStep {
    /// The trial whose full step was accepted.
    pub trial: StepTrial,
    /// Length of the accepted step [m].
    pub step: fpr,
    /// Suggested length of the next step [m].
    pub next_step: fpr,
    /// Number of trials performed.
    pub n_trials: u32,
}

/// Propagates magnetically charged particles through a magnetic field
/// with the Boris push, adapting the step length to a target error.
/// Particles without magnetic charge move in straight lines.
#[derive(Clone, Debug)]
pub struct MonopolePropagator {
    sampler: FieldSampler,
    tolerance: fpr,
    bounds: StepBounds,
    renormalize_substeps: bool,
}

impl MonopolePropagator {
    /// Largest factor by which the step may shrink in one trial.
    const MIN_STEP_SCALE: fpr = 0.1;
    /// Largest factor by which the step may grow between calls.
    const MAX_STEP_SCALE: fpr = 5.0;
    /// Scaling factor for the step to avoid oscillating around the tolerance.
    const SAFETY_FACTOR: fpr = 0.95;
    /// Exponent of the error ratio in the step control law.
    const CONTROL_EXPONENT: fpr = -0.2;

    /// Creates a new propagator with the given configuration.
    pub fn new(sampler: FieldSampler, config: MonopolePropagatorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            sampler,
            tolerance: config.tolerance,
            bounds: StepBounds::new(config.min_step, config.max_step)?,
            renormalize_substeps: config.renormalize_substeps,
        })
    }

    /// Creates a new propagator that always takes steps of the given length.
    pub fn fixed_step(sampler: FieldSampler, step: fpr) -> ConfigResult<Self> {
        Self::new(sampler, MonopolePropagatorConfig::fixed_step(step))
    }

    /// Creates a new propagator with adaptive step length.
    pub fn adaptive(
        sampler: FieldSampler,
        tolerance: fpr,
        min_step: fpr,
        max_step: fpr,
    ) -> ConfigResult<Self> {
        Self::new(
            sampler,
            MonopolePropagatorConfig {
                tolerance,
                min_step,
                max_step,
                renormalize_substeps: MonopolePropagatorConfig::DEFAULT_RENORMALIZE_SUBSTEPS,
            },
        )
    }

    pub fn sampler(&self) -> &FieldSampler {
        &self.sampler
    }

    pub fn tolerance(&self) -> fpr {
        self.tolerance
    }

    /// Sets the target error, which must lie in (0, 1].
    pub fn set_tolerance(&mut self, tolerance: fpr) -> ConfigResult<()> {
        validate_tolerance(tolerance)?;
        self.tolerance = tolerance;
        Ok(())
    }

    pub fn minimum_step(&self) -> fpr {
        self.bounds.min_step()
    }

    /// Sets the minimum step, which must satisfy `0 <= min_step <= max_step`.
    pub fn set_minimum_step(&mut self, min_step: fpr) -> ConfigResult<()> {
        self.bounds.set_min_step(min_step)
    }

    pub fn maximum_step(&self) -> fpr {
        self.bounds.max_step()
    }

    /// Sets the maximum step, which must not be below the minimum step.
    pub fn set_maximum_step(&mut self, max_step: fpr) -> ConfigResult<()> {
        self.bounds.set_max_step(max_step)
    }

    pub fn bounds(&self) -> &StepBounds {
        &self.bounds
    }

    /// Runs the step size control loop for a particle starting from the
    /// given state, with the given suggested step length.
    ///
    /// With equal step bounds a single trial of the fixed length is
    /// accepted. Otherwise trials are repeated with shrinking steps until
    /// the direction error is within tolerance or the minimum step is
    /// reached. When the accepted trial was well within tolerance, a
    /// larger step is suggested for the next call.
    #[allow(clippy::float_cmp)]
    pub fn control_step(
        &self,
        pusher: &BorisPusher,
        initial: &TrialState,
        suggested_step: fpr,
    ) -> ControlledStep {
        if self.bounds.is_fixed() {
            let step = self.bounds.max_step();
            return ControlledStep {
                trial: pusher.try_step(initial, step),
                step,
                next_step: step,
                n_trials: 1,
            };
        }

        let mut step = self.bounds.clamp(suggested_step);
        // A zero step would never grow
        if step == 0.0 {
            step = self.bounds.max_step();
        }
        let mut next_step = step;
        let mut n_trials = 0;

        loop {
            let trial = pusher.try_step(initial, step);
            n_trials += 1;

            let error_ratio = trial.direction_error() / self.tolerance;

            if error_ratio > 1.0 {
                if step == self.bounds.min_step() {
                    return ControlledStep {
                        trial,
                        step,
                        next_step,
                        n_trials,
                    };
                }
                let reduced_step = fpr::max(
                    step * Self::step_scale(error_ratio),
                    Self::MIN_STEP_SCALE * step,
                );
                step = fpr::max(reduced_step, self.bounds.min_step());
                next_step = step;
            } else {
                if step != self.bounds.max_step() {
                    let increased_step = fpr::min(
                        step * Self::step_scale(error_ratio),
                        Self::MAX_STEP_SCALE * step,
                    );
                    next_step = self.bounds.clamp(increased_step);
                }
                return ControlledStep {
                    trial,
                    step,
                    next_step,
                    n_trials,
                };
            }
        }
    }

    fn step_scale(error_ratio: fpr) -> fpr {
        if error_ratio > 0.0 {
            Self::SAFETY_FACTOR * error_ratio.powf(Self::CONTROL_EXPONENT)
        } else {
            fpr::INFINITY
        }
    }

    /// Moves a candidate without magnetic charge in a straight line.
    fn propagate_rectilinear(&self, candidate: &mut Candidate) {
        let step = self.bounds.clamp(candidate.next_step());
        let position = candidate.current.position() + &(candidate.current.direction() * step);
        candidate.current.set_position(position);
        candidate.set_current_step(step);
        candidate.set_next_step(self.bounds.max_step());
    }

    /// Returns a short human-readable description of the propagator.
    pub fn description(&self) -> String {
        format!(
            "Propagation in magnetic fields using the adaptive Boris push method. Target error: {}, {}",
            self.tolerance, self.bounds
        )
    }
}

impl Module for MonopolePropagator {
    fn process(&self, candidate: &mut Candidate) {
        candidate.capture_previous();

        let magnetic_charge = candidate.current.magnetic_charge();
        let energy = candidate.current.energy();

        // Without charge or energy there is no impulse to apply
        if magnetic_charge == 0.0 || energy <= 0.0 {
            self.propagate_rectilinear(candidate);
            return;
        }

        let redshift = candidate.redshift();
        let pusher = BorisPusher::new(
            &self.sampler,
            PushParameters {
                redshift,
                mass: energy / C_SQUARED,
                magnetic_charge,
                renormalize_substeps: self.renormalize_substeps,
            },
        );
        let initial = TrialState::new(
            candidate.current.position().clone(),
            candidate.current.direction().clone(),
        );

        let ControlledStep {
            trial,
            step,
            next_step,
            ..
        } = self.control_step(&pusher, &initial, candidate.next_step());

        let StepTrial { accepted, .. } = trial;
        candidate.current.set_position(accepted.position);
        candidate.current.set_direction(&accepted.direction);

        // Work done by the field on the monopole during the step
        let field = self
            .sampler
            .sample(candidate.current.position(), redshift);
        let energy_gain =
            magnetic_charge * field.dot(&(candidate.current.direction() * step));
        candidate.current.set_energy(energy + energy_gain);

        candidate.set_current_step(step);
        candidate.set_next_step(next_step);
    }

    fn description(&self) -> String {
        MonopolePropagator::description(self)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        field::uniform::UniformMagneticField,
        geometry::{Point3, Vec3},
        particle::ParticleState,
    };
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn uniform_sampler(bz: fpr) -> FieldSampler {
        FieldSampler::new(Arc::new(UniformMagneticField::new(Vec3::new(0.0, 0.0, bz))))
    }

    fn monopole_candidate(magnetic_charge: fpr, next_step: fpr) -> Candidate {
        let state = ParticleState::monopole(
            411,
            1.0,
            Point3::origin(),
            Vec3::new(1.0, 0.0, 0.0),
            1e-20,
            magnetic_charge,
        );
        let mut candidate = Candidate::new(state, 0.0);
        candidate.set_next_step(next_step);
        candidate
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert_eq!(
            MonopolePropagator::adaptive(FieldSampler::absent(), 0.0, 1.0, 2.0).unwrap_err(),
            ConfigError::ToleranceOutOfRange(0.0)
        );
        assert!(MonopolePropagator::adaptive(FieldSampler::absent(), 1.5, 1.0, 2.0).is_err());
        assert!(MonopolePropagator::adaptive(FieldSampler::absent(), 0.1, 3.0, 2.0).is_err());
        assert!(MonopolePropagator::adaptive(FieldSampler::absent(), 0.1, -1.0, 2.0).is_err());
        assert!(MonopolePropagator::fixed_step(FieldSampler::absent(), -1.0).is_err());

        let mut propagator =
            MonopolePropagator::adaptive(FieldSampler::absent(), 0.1, 1.0, 2.0).unwrap();
        assert!(propagator.set_tolerance(fpr::NAN).is_err());
        assert!(propagator.set_minimum_step(5.0).is_err());
        assert!(propagator.set_maximum_step(0.5).is_err());
        assert_eq!(propagator.tolerance(), 0.1);
        assert_eq!(propagator.minimum_step(), 1.0);
        assert_eq!(propagator.maximum_step(), 2.0);
        propagator.set_tolerance(1.0).unwrap();
        assert_eq!(propagator.tolerance(), 1.0);
    }

    #[test]
    fn uncharged_particles_move_straight_with_clamped_step() {
        let propagator =
            MonopolePropagator::adaptive(uniform_sampler(1e-9), 0.1, 1.0, 10.0).unwrap();
        let mut candidate = monopole_candidate(0.0, 20.0);
        propagator.process(&mut candidate);
        assert_eq!(candidate.current.position(), &Point3::new(10.0, 0.0, 0.0));
        assert_eq!(candidate.current_step(), 10.0);
        assert_eq!(candidate.next_step(), 10.0);
        assert_eq!(candidate.previous.position(), &Point3::origin());
    }

    #[test]
    fn fixed_step_is_always_used() {
        let propagator = MonopolePropagator::fixed_step(uniform_sampler(1e-3), 2.0).unwrap();
        let mut candidate = monopole_candidate(1.0, 1e-6);
        for _ in 0..5 {
            propagator.process(&mut candidate);
            assert_eq!(candidate.current_step(), 2.0);
            assert_eq!(candidate.next_step(), 2.0);
            assert_abs_diff_eq!(candidate.current.direction().length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn error_above_tolerance_shrinks_step_by_bounded_factor() {
        // The tiny tolerance forces shrinking down to the minimum step
        let sampler = FieldSampler::new(Arc::new(
            crate::field::single_mode::PolarizedSingleModeMagneticField::new(
                100.0,
                10.0,
                1.0,
                Point3::origin(),
                &Vec3::new(1.0, 0.0, 0.0),
                &Vec3::new(0.0, 1.0, 0.0),
                crate::field::single_mode::StrengthNormalization::Amplitude,
                crate::field::single_mode::PolarizationConvention::Polarization,
                crate::field::single_mode::PolarizationMode::Circular,
            )
            .unwrap(),
        ));
        let propagator = MonopolePropagator::adaptive(sampler, 1e-12, 1e-3, 10.0).unwrap();
        let pusher = BorisPusher::new(
            propagator.sampler(),
            PushParameters {
                redshift: 0.0,
                mass: 1.0 / C_SQUARED,
                magnetic_charge: 0.1,
                renormalize_substeps: false,
            },
        );
        let initial = TrialState::new(Point3::origin(), Vec3::new(0.0, 0.6, 0.8));
        let controlled = propagator.control_step(&pusher, &initial, 10.0);
        assert_eq!(controlled.step, 1e-3);
        assert!(controlled.n_trials >= 5);
        assert!(controlled.trial.direction_error() > propagator.tolerance());
    }

    #[test]
    fn small_error_suggests_larger_bounded_step() {
        let propagator =
            MonopolePropagator::adaptive(uniform_sampler(1e-6), 0.1, 1.0, 1000.0).unwrap();
        let mut candidate = monopole_candidate(1.0, 2.0);
        propagator.process(&mut candidate);
        assert_eq!(candidate.current_step(), 2.0);
        assert_eq!(candidate.next_step(), 10.0);
        propagator.process(&mut candidate);
        assert_eq!(candidate.current_step(), 10.0);
        assert_eq!(candidate.next_step(), 50.0);
    }

    #[test]
    fn missing_step_suggestion_starts_from_clamped_step() {
        let propagator =
            MonopolePropagator::adaptive(uniform_sampler(1e-6), 0.1, 1.0, 1000.0).unwrap();
        let mut candidate = monopole_candidate(1.0, 0.0);
        propagator.process(&mut candidate);
        assert_eq!(candidate.current_step(), 1.0);
        assert_eq!(candidate.next_step(), 5.0);

        let propagator =
            MonopolePropagator::adaptive(uniform_sampler(1e-6), 0.1, 0.0, 1000.0).unwrap();
        let mut candidate = monopole_candidate(1.0, 0.0);
        propagator.process(&mut candidate);
        assert_eq!(candidate.current_step(), 1000.0);
        assert_eq!(candidate.next_step(), 1000.0);
    }

    #[test]
    fn field_does_work_along_direction_of_motion() {
        let propagator = MonopolePropagator::fixed_step(
            FieldSampler::new(Arc::new(UniformMagneticField::new(Vec3::new(1e-3, 0.0, 0.0)))),
            2.0,
        )
        .unwrap();
        let mut candidate = monopole_candidate(1.0, 2.0);
        propagator.process(&mut candidate);
        assert!(candidate.current.energy() > 1.0);

        let mut anti_candidate = monopole_candidate(-1.0, 2.0);
        propagator.process(&mut anti_candidate);
        assert!(anti_candidate.current.energy() < 1.0);
    }
}
