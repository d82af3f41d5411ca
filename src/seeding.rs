//! Generation of initial candidates.

use crate::{
    constants::PI,
    error::{ConfigError, ConfigResult},
    geometry::{Point3, Vec3},
    particle::{candidate::Candidate, ParticleState},
    propagation::fpr,
    units::EEV,
};
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

/// How initial directions are chosen.
#[derive(Clone, Debug, PartialEq)]
pub enum DirectionDistribution {
    /// All candidates start in the same direction.
    Fixed(Vec3<fpr>),
    /// Directions are drawn uniformly over the unit sphere.
    Isotropic,
}

/// Configuration parameters for sources.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    /// Particle identity code. Negative codes denote anti-monopoles.
    pub id: i32,
    /// Initial energy [J].
    pub energy: fpr,
    /// Rest mass [kg].
    pub mass: fpr,
    /// Magnetic charge [A m].
    pub magnetic_charge: fpr,
    /// Initial position [m].
    pub position: Point3<fpr>,
    /// Redshift of the candidates.
    pub redshift: fpr,
    /// Initial suggested step length [m].
    pub initial_step: fpr,
    pub directions: DirectionDistribution,
    /// Seed for the random number generator, or `None` for a random seed.
    pub seed: Option<u64>,
}

impl SourceConfig {
    pub const DEFAULT_ID: i32 = 411;
    pub const DEFAULT_ENERGY: fpr = 1.0 * EEV;
    pub const DEFAULT_MASS: fpr = 1.78e-24;
    pub const DEFAULT_REDSHIFT: fpr = 0.0;
    pub const DEFAULT_INITIAL_STEP: fpr = 0.0;

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("Energy", self.energy),
            ("Mass", self.mass),
            ("Magnetic charge", self.magnetic_charge),
            ("Redshift", self.redshift),
            ("Initial step", self.initial_step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        if !self.position.is_finite() {
            return Err(ConfigError::InvalidField(format!(
                "source position {} is not finite",
                self.position
            )));
        }
        if self.energy <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "Energy",
                value: self.energy,
            });
        }
        if self.mass <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "Mass",
                value: self.mass,
            });
        }
        if self.redshift <= -1.0 {
            return Err(ConfigError::InvalidField(format!(
                "redshift {} must exceed -1",
                self.redshift
            )));
        }
        if let DirectionDistribution::Fixed(direction) = &self.directions {
            if !direction.is_finite() || direction.is_zero() {
                return Err(ConfigError::InvalidField(format!(
                    "initial direction {} must be finite and non-zero",
                    direction
                )));
            }
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT_ID,
            energy: Self::DEFAULT_ENERGY,
            mass: Self::DEFAULT_MASS,
            magnetic_charge: crate::constants::G_DIRAC,
            position: Point3::origin(),
            redshift: Self::DEFAULT_REDSHIFT,
            initial_step: Self::DEFAULT_INITIAL_STEP,
            directions: DirectionDistribution::Isotropic,
            seed: None,
        }
    }
}

/// Creates candidates with identical properties apart from their direction.
#[derive(Clone, Debug)]
pub struct Source {
    config: SourceConfig,
}

impl Source {
    pub fn new(config: SourceConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Creates the given number of candidates.
    pub fn create_candidates(&self, n_candidates: usize) -> Vec<Candidate> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        (0..n_candidates)
            .map(|_| {
                let direction = match &self.config.directions {
                    DirectionDistribution::Fixed(direction) => direction.clone(),
                    DirectionDistribution::Isotropic => random_isotropic_direction(&mut rng),
                };
                self.create_candidate(direction)
            })
            .collect()
    }

    fn create_candidate(&self, direction: Vec3<fpr>) -> Candidate {
        let state = ParticleState::monopole(
            self.config.id,
            self.config.energy,
            self.config.position.clone(),
            direction,
            self.config.mass,
            self.config.magnetic_charge,
        );
        let mut candidate = Candidate::new(state, self.config.redshift);
        candidate.set_next_step(self.config.initial_step);
        candidate
    }

    pub fn description(&self) -> String {
        format!(
            "Source at {} with E = {} EeV, {} directions",
            self.config.position,
            self.config.energy / EEV,
            match self.config.directions {
                DirectionDistribution::Fixed(_) => "fixed",
                DirectionDistribution::Isotropic => "isotropic",
            }
        )
    }
}

/// Draws a unit vector uniformly distributed over the sphere.
pub fn random_isotropic_direction<R: Rng>(rng: &mut R) -> Vec3<fpr> {
    let cos_theta_distribution = Uniform::new_inclusive(-1.0, 1.0);
    let phi_distribution = Uniform::new(0.0, 2.0 * PI);

    let cos_theta: fpr = cos_theta_distribution.sample(rng);
    let phi: fpr = phi_distribution.sample(rng);
    let sin_theta = fpr::sqrt(fpr::max(0.0, 1.0 - cos_theta * cos_theta));

    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
