//! Per-particle simulation record.

use super::ParticleState;
use crate::propagation::fpr;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// A particle being propagated, together with its previous state
/// and the step length bookkeeping shared between modules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Candidate {
    /// State after the most recent step.
    pub current: ParticleState,
    /// State before the most recent step.
    pub previous: ParticleState,
    redshift: fpr,
    trajectory_length: fpr,
    current_step: fpr,
    next_step: fpr,
    step_radiation: fpr,
    total_radiation: fpr,
    active: bool,
}

impl Candidate {
    /// Creates a new active candidate starting from the given state.
    pub fn new(state: ParticleState, redshift: fpr) -> Self {
        Self {
            previous: state.clone(),
            current: state,
            redshift,
            trajectory_length: 0.0,
            current_step: 0.0,
            next_step: 0.0,
            step_radiation: 0.0,
            total_radiation: 0.0,
            active: true,
        }
    }

    /// Stores a snapshot of the current state as the previous state.
    pub fn capture_previous(&mut self) {
        self.previous = self.current.clone();
    }

    pub fn redshift(&self) -> fpr {
        self.redshift
    }

    pub fn set_redshift(&mut self, redshift: fpr) {
        self.redshift = redshift;
    }

    /// Comoving distance travelled so far [m].
    pub fn trajectory_length(&self) -> fpr {
        self.trajectory_length
    }

    pub fn current_step(&self) -> fpr {
        self.current_step
    }

    /// Sets the length of the step just taken and adds it to the
    /// trajectory length.
    pub fn set_current_step(&mut self, step: fpr) {
        self.current_step = step;
        self.trajectory_length += step;
    }

    /// Suggested length of the next step.
    pub fn next_step(&self) -> fpr {
        self.next_step
    }

    pub fn set_next_step(&mut self, step: fpr) {
        self.next_step = step;
    }

    /// Lowers the suggested next step to the given value if it is smaller.
    pub fn limit_next_step(&mut self, step: fpr) {
        self.next_step = fpr::min(self.next_step, step);
    }

    /// Energy radiated during the most recent step [J].
    pub fn step_radiation(&self) -> fpr {
        self.step_radiation
    }

    /// Sets the energy radiated during the step just taken and adds it
    /// to the total radiated energy.
    pub fn set_step_radiation(&mut self, energy_loss: fpr) {
        self.step_radiation = energy_loss;
        self.total_radiation += energy_loss;
    }

    /// Energy radiated over the whole trajectory so far [J].
    pub fn total_radiation(&self) -> fpr {
        self.total_radiation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
