//! Command line interface for propagating monopoles.

pub mod field;
pub mod radiation;
pub mod source;
pub mod stepping;

use self::{
    field::{add_field_arguments_to_subcommand, construct_field_sampler_from_arguments},
    radiation::{add_radiation_arguments_to_subcommand, construct_radiation_from_arguments},
    source::{
        add_source_arguments_to_subcommand, construct_source_from_arguments,
        get_particle_count_from_arguments,
    },
    stepping::{add_stepping_arguments_to_subcommand, construct_propagator_from_arguments},
};
use crate::{
    cli::utils as cli_utils,
    exit_on_error,
    propagation::fpr,
    simulation::{BatchSummary, MaximumTrajectoryLength, ModuleList},
    units::KPC,
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `propagate` command line subcommand.
pub fn create_propagate_subcommand() -> Command<'static> {
    let command = Command::new("propagate")
        .about("Propagate magnetic monopoles through a magnetic field")
        .long_about(
            "Propagate magnetic monopoles through a magnetic field.\n\
             The monopoles are moved with an adaptive Boris push and lose energy\n\
             through radiation until they reach the maximum trajectory length.",
        )
        .arg(
            Arg::new("max-trajectory-length")
                .long("max-trajectory-length")
                .require_equals(true)
                .value_name("VALUE")
                .help("Distance after which propagation stops [kpc]")
                .takes_value(true)
                .default_value("100.0"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages related to propagation"),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar for propagation (also implies `verbose`)"),
        );
    let command = add_field_arguments_to_subcommand(command);
    let command = add_source_arguments_to_subcommand(command);
    let command = add_stepping_arguments_to_subcommand(command);
    add_radiation_arguments_to_subcommand(command)
}

/// Runs the actions for the `propagate` subcommand using the given arguments.
pub fn run_propagate_subcommand(arguments: &ArgMatches) -> BatchSummary {
    let verbosity = cli_utils::parse_verbosity(arguments, true);

    let sampler = construct_field_sampler_from_arguments(arguments);
    let source = construct_source_from_arguments(arguments);
    let n_particles = get_particle_count_from_arguments(arguments);

    let max_trajectory_length = cli_utils::get_finite_float_value_from_required_parseable_argument::<
        fpr,
    >(arguments, "max-trajectory-length")
        * KPC;

    let mut modules = ModuleList::new();
    modules.add(construct_propagator_from_arguments(
        sampler.clone(),
        arguments,
    ));
    if let Some(radiation) = construct_radiation_from_arguments(sampler.clone(), arguments) {
        modules.add(radiation);
    }
    modules.add(exit_on_error!(
        MaximumTrajectoryLength::new(max_trajectory_length),
        "Error: Invalid maximum trajectory length: {}"
    ));

    if verbosity.print_messages() {
        println!("{}", source.description());
        println!("Field: {}", sampler.description());
        println!("Modules:\n{}", modules.description());
    }

    let mut candidates = source.create_candidates(n_particles);
    let summary = modules.run_batch(&mut candidates, &verbosity);

    let n_failures = sampler.n_failures();
    if n_failures > 0 {
        eprintln!(
            "Warning: Magnetic field could not be sampled {} times",
            n_failures
        );
    }
    println!("{}", summary);
    summary
}
