//! Unit conversion factors to SI.

/// Floating-point precision to use for units.
#[allow(non_camel_case_types)]
pub type fun = f64;

/// Electron volt [J].
pub const EV: fun = 1.602_176_487e-19;
/// Giga electron volt [J].
pub const GEV: fun = EV * 1e9;
/// Exa electron volt [J].
pub const EEV: fun = EV * 1e18;

/// Parsec [m].
pub const PARSEC: fun = 3.085_677_581_3e16;
/// Kiloparsec [m].
pub const KPC: fun = PARSEC * 1e3;
/// Megaparsec [m].
pub const MPC: fun = PARSEC * 1e6;

/// Gauss [T].
pub const GAUSS: fun = 1e-4;
/// Nanogauss [T].
pub const NANO_GAUSS: fun = GAUSS * 1e-9;

/// Ampere metre, the unit of magnetic charge [A m].
pub const AMPERE_METRE: fun = 1.0;
/// Kilogram [kg].
pub const KILOGRAM: fun = 1.0;
