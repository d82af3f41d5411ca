//! Physical and mathematical constants.
//!
//! All values are in SI units.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

// Mathematical constants

pub const PI: fcn = std::f64::consts::PI;

// Physical constants

/// Speed of light in vacuum [m/s].
pub const C_LIGHT: fcn = 299_792_458.0;
/// Squared speed of light in vacuum [m^2/s^2].
pub const C_SQUARED: fcn = C_LIGHT * C_LIGHT;
/// Vacuum permeability [N/A^2].
pub const MU0: fcn = 4.0 * PI * 1e-7;
/// Elementary charge [C].
pub const Q_ELECTRON: fcn = 1.602_176_487e-19;
/// Fine structure constant.
pub const ALPHA_FINESTRUCTURE: fcn = 0.007_297_352_570_3;
/// Reduced Planck constant [J s].
pub const HBAR: fcn = 1.054_571_628e-34;
/// Magnetic charge of the Dirac monopole, 2 pi hbar / (mu0 e) [A m].
pub const G_DIRAC: fcn = 2.0 * PI * HBAR / (MU0 * Q_ELECTRON);
