//! Kinematic state of propagated particles.

pub mod candidate;

use crate::{
    constants::{C_LIGHT, C_SQUARED},
    geometry::{Point3, Vec3},
    propagation::fpr,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Kinematic state and identity of a (possibly magnetically charged) particle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct ParticleState {
    /// Particle identity code.
    id: i32,
    /// Kinetic energy [J].
    energy: fpr,
    /// Position in comoving coordinates [m].
    position: Point3<fpr>,
    /// Unit direction of motion.
    direction: Vec3<fpr>,
    /// Rest mass [kg].
    mass: fpr,
    /// Electric charge [C].
    charge: fpr,
    /// Magnetic charge [A m].
    magnetic_charge: fpr,
}

impl ParticleState {
    /// Creates a new particle state.
    ///
    /// The energy is clamped to be non-negative and the direction is
    /// normalized. A zero direction falls back to the x-axis.
    pub fn new(
        id: i32,
        energy: fpr,
        position: Point3<fpr>,
        direction: Vec3<fpr>,
        mass: fpr,
        charge: fpr,
        magnetic_charge: fpr,
    ) -> Self {
        let mut state = Self {
            id,
            energy: 0.0,
            position,
            direction: Vec3::new(1.0, 0.0, 0.0),
            mass,
            charge,
            magnetic_charge,
        };
        state.set_energy(energy);
        state.set_direction(&direction);
        state
    }

    /// Creates a new magnetic monopole state. Anti-monopoles (negative
    /// identity codes) get the sign of the magnetic charge flipped.
    pub fn monopole(
        id: i32,
        energy: fpr,
        position: Point3<fpr>,
        direction: Vec3<fpr>,
        mass: fpr,
        magnetic_charge: fpr,
    ) -> Self {
        let magnetic_charge = if id < 0 {
            -magnetic_charge
        } else {
            magnetic_charge
        };
        Self::new(id, energy, position, direction, mass, 0.0, magnetic_charge)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn energy(&self) -> fpr {
        self.energy
    }

    /// Sets the energy, preventing it from becoming negative.
    pub fn set_energy(&mut self, energy: fpr) {
        self.energy = fpr::max(0.0, energy);
    }

    pub fn position(&self) -> &Point3<fpr> {
        &self.position
    }

    pub fn set_position(&mut self, position: Point3<fpr>) {
        self.position = position;
    }

    pub fn direction(&self) -> &Vec3<fpr> {
        &self.direction
    }

    /// Sets the direction to the unit vector along the given vector.
    ///
    /// Returns `false` and keeps the current direction if the given
    /// vector has no well-defined direction.
    pub fn set_direction(&mut self, direction: &Vec3<fpr>) -> bool {
        match direction.normalized() {
            Some(unit_direction) => {
                self.direction = unit_direction;
                true
            }
            None => false,
        }
    }

    pub fn mass(&self) -> fpr {
        self.mass
    }

    pub fn charge(&self) -> fpr {
        self.charge
    }

    pub fn magnetic_charge(&self) -> fpr {
        self.magnetic_charge
    }

    /// Computes the Lorentz factor E / (m c^2).
    pub fn lorentz_factor(&self) -> fpr {
        self.energy / (self.mass * C_SQUARED)
    }

    /// Sets the energy corresponding to the given Lorentz factor.
    pub fn set_lorentz_factor(&mut self, lorentz_factor: fpr) {
        self.set_energy(fpr::max(0.0, lorentz_factor) * self.mass * C_SQUARED);
    }

    /// Computes the velocity, assuming the particle moves at the speed of light.
    pub fn velocity(&self) -> Vec3<fpr> {
        &self.direction * C_LIGHT
    }

    /// Computes the momentum of the ultrarelativistic particle.
    pub fn momentum(&self) -> Vec3<fpr> {
        &self.direction * (self.energy / C_LIGHT)
    }

    /// Computes the rigidity |E / q|.
    pub fn rigidity(&self) -> fpr {
        fpr::abs(self.energy / self.charge)
    }

    /// Returns a short human-readable summary of the state.
    pub fn description(&self) -> String {
        use crate::units::{EEV, MPC};
        format!(
            "Particle {}, E = {} EeV, x = {} Mpc, p = {}",
            self.id,
            self.energy / EEV,
            self.position.to_vec3() / MPC,
            self.direction
        )
    }
}

impl Default for ParticleState {
    fn default() -> Self {
        Self::new(0, 0.0, Point3::origin(), Vec3::new(1.0, 0.0, 0.0), 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn energy_is_never_negative() {
        let mut state = ParticleState::default();
        state.set_energy(-5.0);
        assert_eq!(state.energy(), 0.0);
        state.set_lorentz_factor(-2.0);
        assert_eq!(state.energy(), 0.0);
    }

    #[test]
    fn direction_is_normalized_on_assignment() {
        let mut state = ParticleState::default();
        assert!(state.set_direction(&Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(state.direction(), &Vec3::new(0.0, 1.0, 0.0));
        assert!(!state.set_direction(&Vec3::zero()));
        assert_eq!(state.direction(), &Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn anti_monopole_has_flipped_magnetic_charge() {
        let state = ParticleState::monopole(
            -411,
            1.0,
            Point3::origin(),
            Vec3::new(1.0, 0.0, 0.0),
            1e-20,
            3.0,
        );
        assert_eq!(state.magnetic_charge(), -3.0);
        assert_eq!(state.charge(), 0.0);
    }
}
