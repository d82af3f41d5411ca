//! Straight-line propagation ignoring all fields.

use super::{fpr, StepBounds};
use crate::{error::ConfigResult, particle::candidate::Candidate, simulation::Module};

/// Moves particles in straight lines with steps between given bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearPropagator {
    bounds: StepBounds,
}

impl RectilinearPropagator {
    pub fn new(min_step: fpr, max_step: fpr) -> ConfigResult<Self> {
        Ok(Self {
            bounds: StepBounds::new(min_step, max_step)?,
        })
    }

    pub fn bounds(&self) -> &StepBounds {
        &self.bounds
    }

    pub fn set_minimum_step(&mut self, min_step: fpr) -> ConfigResult<()> {
        self.bounds.set_min_step(min_step)
    }

    pub fn set_maximum_step(&mut self, max_step: fpr) -> ConfigResult<()> {
        self.bounds.set_max_step(max_step)
    }

    pub fn description(&self) -> String {
        format!("Rectilinear propagation. {}", self.bounds)
    }
}

impl Module for RectilinearPropagator {
    fn process(&self, candidate: &mut Candidate) {
        candidate.capture_previous();
        let step = self.bounds.clamp(candidate.next_step());
        let position = candidate.current.position() + &(candidate.current.direction() * step);
        candidate.current.set_position(position);
        candidate.set_current_step(step);
        candidate.set_next_step(self.bounds.max_step());
    }

    fn description(&self) -> String {
        RectilinearPropagator::description(self)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        geometry::{Point3, Vec3},
        particle::ParticleState,
    };

    #[test]
    fn steps_are_clamped_and_next_step_is_maximal() {
        let propagator = RectilinearPropagator::new(1.0, 5.0).unwrap();
        let state = ParticleState::monopole(
            411,
            1.0,
            Point3::origin(),
            Vec3::new(0.0, 0.0, 2.0),
            1e-20,
            1.0,
        );
        let mut candidate = Candidate::new(state, 0.0);
        candidate.set_next_step(0.1);

        propagator.process(&mut candidate);
        assert_eq!(candidate.current.position(), &Point3::new(0.0, 0.0, 1.0));
        assert_eq!(candidate.next_step(), 5.0);

        propagator.process(&mut candidate);
        assert_eq!(candidate.current.position(), &Point3::new(0.0, 0.0, 6.0));
        assert_eq!(candidate.previous.position(), &Point3::new(0.0, 0.0, 1.0));
        assert_eq!(candidate.trajectory_length(), 6.0);
    }
}
