//! The `monoprop` crate propagates magnetic monopoles through cosmic
//! magnetic fields with an adaptive Boris push, including their
//! radiative energy loss.

pub mod constants;
pub mod error;
pub mod field;
pub mod geometry;
pub mod io;
pub mod num;
pub mod particle;
pub mod propagation;
pub mod radiation;
pub mod simulation;
pub mod units;

#[cfg(feature = "seeding")]
pub mod seeding;

#[cfg(feature = "cli")]
pub mod cli;
