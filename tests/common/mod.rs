#![allow(dead_code)]

use lazy_static::lazy_static;
use monoprop::{
    cli,
    constants::G_DIRAC,
    field::{
        sampler::FieldSampler,
        single_mode::{
            PolarizationConvention, PolarizationMode, PolarizedSingleModeMagneticField,
            StrengthNormalization,
        },
        uniform::UniformMagneticField,
    },
    geometry::{Point3, Vec3},
    particle::{candidate::Candidate, ParticleState},
    propagation::fpr,
    simulation::BatchSummary,
    units::{EEV, KPC, NANO_GAUSS},
};
use std::{ffi::OsString, sync::Arc};

lazy_static! {
    static ref COMMAND: clap::Command<'static> = cli::build::build();
}

/// Runs the `propagate` subcommand with the given arguments and returns
/// the summary of the propagated batch.
pub fn run_propagate<I, T>(args: I) -> BatchSummary
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let arguments = COMMAND
        .clone()
        .get_matches_from(std::iter::once(OsString::from("monoprop")).chain(
            std::iter::once(OsString::from("propagate")).chain(args.into_iter().map(Into::into)),
        ));
    let propagate_arguments = arguments
        .subcommand_matches("propagate")
        .expect("Missing propagate subcommand");
    cli::propagate::run_propagate_subcommand(propagate_arguments)
}

pub const MONOPOLE_ID: i32 = 411;
pub const MONOPOLE_MASS: fpr = 1.78e-24;

pub fn uniform_sampler(field: Vec3<fpr>) -> FieldSampler {
    FieldSampler::new(Arc::new(UniformMagneticField::new(field)))
}

pub fn helical_sampler() -> FieldSampler {
    FieldSampler::new(Arc::new(
        PolarizedSingleModeMagneticField::new(
            10.0 * NANO_GAUSS,
            KPC,
            1.0,
            Point3::origin(),
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
            StrengthNormalization::Amplitude,
            PolarizationConvention::Polarization,
            PolarizationMode::Circular,
        )
        .unwrap(),
    ))
}

pub fn monopole_candidate(
    energy: fpr,
    direction: Vec3<fpr>,
    magnetic_charge: fpr,
    next_step: fpr,
) -> Candidate {
    let state = ParticleState::monopole(
        MONOPOLE_ID,
        energy,
        Point3::origin(),
        direction,
        MONOPOLE_MASS,
        magnetic_charge,
    );
    let mut candidate = Candidate::new(state, 0.0);
    candidate.set_next_step(next_step);
    candidate
}

pub fn dirac_monopole(direction: Vec3<fpr>, next_step: fpr) -> Candidate {
    monopole_candidate(EEV, direction, G_DIRAC, next_step)
}
