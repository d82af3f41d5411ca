mod common;

use approx::assert_abs_diff_eq;
use common::{dirac_monopole, helical_sampler, monopole_candidate, uniform_sampler};
use monoprop::{
    constants::{C_SQUARED, G_DIRAC},
    field::sampler::FieldSampler,
    geometry::{Point3, Vec3},
    io::Verbosity,
    propagation::{
        adaptive::MonopolePropagator,
        boris::{BorisPusher, PushParameters, TrialState},
        fpr,
    },
    radiation::{MonopoleRadiation, MonopoleRadiationConfig, RadiationFieldSource},
    simulation::{MaximumTrajectoryLength, Module, ModuleList},
    units::{EEV, KPC},
};

const MIN_STEP: fpr = 1e10;
const MAX_STEP: fpr = 1e14;
const TOLERANCE: fpr = 0.42;

fn nanotesla_field_propagator() -> MonopolePropagator {
    MonopolePropagator::adaptive(
        uniform_sampler(Vec3::new(0.0, 0.0, 1e-9)),
        TOLERANCE,
        MIN_STEP,
        MAX_STEP,
    )
    .unwrap()
}

#[test]
fn adaptive_step_in_uniform_field_stays_in_bounds() {
    let propagator = nanotesla_field_propagator();
    let mut candidate = dirac_monopole(Vec3::new(1.0, 0.0, 0.0), 1e13);

    propagator.process(&mut candidate);

    let step = candidate.current_step();
    assert!((MIN_STEP..=MAX_STEP).contains(&step));
    assert!((MIN_STEP..=MAX_STEP).contains(&candidate.next_step()));
    assert_abs_diff_eq!(candidate.current.direction().length(), 1.0, epsilon = 1e-12);
    assert_eq!(candidate.previous.position(), &Point3::origin());
}

#[test]
fn uniform_field_error_is_negligible_for_all_steps() {
    let sampler = uniform_sampler(Vec3::new(0.0, 0.0, 1e-9));
    let pusher = BorisPusher::new(
        &sampler,
        PushParameters {
            redshift: 0.0,
            mass: EEV / C_SQUARED,
            magnetic_charge: G_DIRAC,
            renormalize_substeps: false,
        },
    );
    let initial = TrialState::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
    for step in [MAX_STEP, 0.1 * MAX_STEP, 0.01 * MAX_STEP] {
        assert!(pusher.try_step(&initial, step).error < 1e-12);
    }
}

#[test]
fn smaller_suggested_step_gives_smaller_error_estimate() {
    let sampler = helical_sampler();
    let propagator =
        MonopolePropagator::adaptive(sampler, TOLERANCE, 1e-4 * KPC, KPC).unwrap();
    let pusher = BorisPusher::new(
        propagator.sampler(),
        PushParameters {
            redshift: 0.0,
            mass: EEV / C_SQUARED,
            magnetic_charge: G_DIRAC,
            renormalize_substeps: false,
        },
    );
    let initial = TrialState::new(Point3::origin(), Vec3::new(0.0, 0.6, 0.8));

    let coarse = propagator.control_step(&pusher, &initial, 0.1 * KPC);
    let fine = propagator.control_step(&pusher, &initial, 0.01 * KPC);

    assert_eq!(coarse.step, 0.1 * KPC);
    assert_eq!(fine.step, 0.01 * KPC);
    assert!(coarse.trial.error > 0.0);
    assert!(fine.trial.error < coarse.trial.error);
}

#[test]
fn uncharged_particle_moves_exactly_one_maximum_step() {
    let propagator = nanotesla_field_propagator();
    let mut candidate = monopole_candidate(EEV, Vec3::new(1.0, 0.0, 0.0), 0.0, 2.0 * MAX_STEP);

    propagator.process(&mut candidate);

    assert_eq!(candidate.current.position(), &Point3::new(MAX_STEP, 0.0, 0.0));
    assert_eq!(candidate.current_step(), MAX_STEP);
    assert_eq!(candidate.next_step(), MAX_STEP);
    assert_eq!(candidate.current.energy(), EEV);
}

#[test]
fn fixed_step_is_used_for_every_step() {
    let propagator =
        MonopolePropagator::fixed_step(helical_sampler(), 0.05 * KPC).unwrap();
    let mut candidate = dirac_monopole(Vec3::new(0.3, 0.4, 0.5), 0.0);
    for _ in 0..20 {
        propagator.process(&mut candidate);
        assert_eq!(candidate.current_step(), 0.05 * KPC);
        assert_abs_diff_eq!(candidate.current.direction().length(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn absent_field_propagates_charged_particle_in_straight_line() {
    let propagator =
        MonopolePropagator::adaptive(FieldSampler::absent(), TOLERANCE, MIN_STEP, MAX_STEP)
            .unwrap();
    let mut candidate = dirac_monopole(Vec3::new(0.0, 1.0, 0.0), 1e12);
    propagator.process(&mut candidate);
    assert_eq!(candidate.current.direction(), &Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(candidate.current.position(), &Point3::new(0.0, 1e12, 0.0));
    assert_eq!(candidate.next_step(), 5e12);
}

#[test]
fn full_simulation_conserves_bounds_and_stops_at_maximum_length() {
    let sampler = helical_sampler();
    let mut modules = ModuleList::new();
    modules
        .add(
            MonopolePropagator::adaptive(sampler.clone(), 1e-3, 0.0, 0.1 * KPC).unwrap(),
        )
        .add(
            MonopoleRadiation::new(
                RadiationFieldSource::Field(sampler),
                MonopoleRadiationConfig::default(),
            )
            .unwrap(),
        )
        .add(MaximumTrajectoryLength::new(5.0 * KPC).unwrap());

    let mut candidates: Vec<_> = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(-0.2, 0.5, 0.7),
    ]
    .into_iter()
    .map(|direction| dirac_monopole(direction, 0.0))
    .collect();

    let summary = modules.run_batch(&mut candidates, &Verbosity::Quiet);

    assert_eq!(summary.n_candidates, 3);
    assert_eq!(summary.n_non_finite, 0);
    for candidate in &candidates {
        assert!(!candidate.is_active());
        assert_abs_diff_eq!(candidate.trajectory_length(), 5.0 * KPC, epsilon = 1e-6 * KPC);
        assert!(candidate.current.energy() >= 0.0);
        assert!(candidate.total_radiation() >= 0.0);
        assert_abs_diff_eq!(candidate.current.direction().length(), 1.0, epsilon = 1e-12);
    }
}
