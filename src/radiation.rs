//! Radiative energy loss of accelerated magnetic monopoles.

use crate::{
    constants::{C_LIGHT, MU0, PI},
    error::{ConfigError, ConfigResult},
    field::sampler::FieldSampler,
    particle::candidate::Candidate,
    propagation::fpr,
    simulation::Module,
    units::NANO_GAUSS,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Where the radiation model gets the magnetic field strength from.
#[derive(Clone, Debug)]
pub enum RadiationFieldSource {
    /// Sample the field at the particle position.
    Field(FieldSampler),
    /// Assume a turbulent field with the given root-mean-square strength [T].
    RmsStrength(fpr),
}

/// Configuration parameters for the radiation model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct MonopoleRadiationConfig {
    /// Largest fraction of the energy that may be lost in a single step.
    pub limit: fpr,
}

impl MonopoleRadiationConfig {
    pub const DEFAULT_LIMIT: fpr = 0.1;

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.limit.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "Energy loss limit",
                value: self.limit,
            });
        }
        if self.limit <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "Energy loss limit",
                value: self.limit,
            });
        }
        Ok(())
    }
}

impl Default for MonopoleRadiationConfig {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Energy radiated by a candidate during one step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct RadiationLoss {
    /// Radiated energy [J].
    pub energy_loss: fpr,
    /// Radiated energy per unit length in the local frame [J/m].
    pub loss_rate: fpr,
    /// Field strength perpendicular to the direction of motion,
    /// scaled to the redshift of the candidate [T].
    pub perpendicular_field: fpr,
}

/// Removes the energy radiated by magnetic monopoles whose direction
/// changed during the last step, and limits the next step so that only
/// a fraction of the energy can be lost per step.
#[derive(Clone, Debug)]
pub struct MonopoleRadiation {
    field_source: RadiationFieldSource,
    limit: fpr,
}

impl MonopoleRadiation {
    /// Creates a new radiation model with the given configuration.
    pub fn new(
        field_source: RadiationFieldSource,
        config: MonopoleRadiationConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;
        if let RadiationFieldSource::RmsStrength(strength) = &field_source {
            if !(strength.is_finite() && *strength >= 0.0) {
                return Err(ConfigError::InvalidField(format!(
                    "RMS field strength must be finite and non-negative, got {}",
                    strength
                )));
            }
        }
        Ok(Self {
            field_source,
            limit: config.limit,
        })
    }

    pub fn field_source(&self) -> &RadiationFieldSource {
        &self.field_source
    }

    pub fn limit(&self) -> fpr {
        self.limit
    }

    pub fn set_limit(&mut self, limit: fpr) -> ConfigResult<()> {
        MonopoleRadiationConfig { limit }.validate()?;
        self.limit = limit;
        Ok(())
    }

    /// Field strength perpendicular to the current direction of the
    /// candidate, scaled by `(1 + z)^2`.
    pub fn perpendicular_field(&self, candidate: &Candidate) -> fpr {
        let redshift = candidate.redshift();
        let strength = match &self.field_source {
            RadiationFieldSource::Field(sampler) if sampler.is_valid() => sampler
                .sample(candidate.current.position(), redshift)
                .cross(candidate.current.direction())
                .length(),
            RadiationFieldSource::Field(_) => 0.0,
            // Average perpendicular component of an isotropic field
            RadiationFieldSource::RmsStrength(rms) => fpr::sqrt(2.0 / 3.0) * rms,
        };
        strength * fpr::powi(1.0 + redshift, 2)
    }

    /// Applies the radiative energy loss of the last step to the candidate.
    ///
    /// The loss rate follows the Liénard formula for a magnetic charge,
    /// `mu0 / (6 pi) gamma^6 (g / c)^2 (|dbeta|^2 - |beta x dbeta|^2)`,
    /// with `dbeta` the change in velocity between the previous and current
    /// state divided by the local step length, which equals the change in
    /// velocity over c per unit time.
    ///
    /// # Returns
    ///
    /// The loss, or `None` if the candidate was left untouched because it has
    /// no magnetic charge, no mass or took no step.
    pub fn apply(&self, candidate: &mut Candidate) -> Option<RadiationLoss> {
        let magnetic_charge = fpr::abs(candidate.current.magnetic_charge());
        if magnetic_charge == 0.0 || candidate.current.mass() <= 0.0 {
            return None;
        }

        let redshift = candidate.redshift();
        let local_step = candidate.current_step() / (1.0 + redshift);
        if !(local_step > 0.0) {
            return None;
        }

        let perpendicular_field = self.perpendicular_field(candidate);

        let lorentz_factor = candidate.current.lorentz_factor();
        let beta = candidate.current.direction();
        let velocity_change =
            &candidate.current.velocity() - &candidate.previous.velocity();
        let beta_rate = velocity_change / local_step;

        let transverse = beta.cross(&beta_rate);
        let loss_rate = MU0 / (6.0 * PI)
            * fpr::powi(lorentz_factor, 6)
            * fpr::powi(magnetic_charge / C_LIGHT, 2)
            * (beta_rate.squared_length() - transverse.squared_length());
        if loss_rate.is_nan() {
            return None;
        }
        // Negative values can only come from round-off
        let loss_rate = fpr::max(0.0, loss_rate);

        let energy_loss = local_step * loss_rate;
        candidate.set_step_radiation(energy_loss);

        let energy = candidate.current.energy();
        candidate.current.set_energy(energy - energy_loss);
        if loss_rate > 0.0 {
            candidate.limit_next_step(self.limit * energy / loss_rate);
        }

        Some(RadiationLoss {
            energy_loss,
            loss_rate,
            perpendicular_field,
        })
    }

    pub fn description(&self) -> String {
        let field = match &self.field_source {
            RadiationFieldSource::Field(sampler) => sampler.description(),
            RadiationFieldSource::RmsStrength(rms) => format!("Brms = {} nG", rms / NANO_GAUSS),
        };
        format!(
            "Radiation of magnetic monopoles. {}, energy loss limit per step: {}",
            field, self.limit
        )
    }
}

impl Module for MonopoleRadiation {
    fn process(&self, candidate: &mut Candidate) {
        self.apply(candidate);
    }

    fn description(&self) -> String {
        MonopoleRadiation::description(self)
    }
}
