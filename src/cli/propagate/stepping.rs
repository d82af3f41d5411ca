//! Command line interface for the adaptive monopole propagator.

use crate::{
    cli::utils as cli_utils, exit_on_error, field::sampler::FieldSampler,
    propagation::adaptive::{MonopolePropagator, MonopolePropagatorConfig}, units::KPC,
};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for parameters used by the monopole propagator.
pub fn add_stepping_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .require_equals(true)
                .value_name("VALUE")
                .help("Target relative error of each step, in (0, 1]")
                .takes_value(true)
                .default_value("1e-4"),
        )
        .arg(
            Arg::new("min-step")
                .long("min-step")
                .require_equals(true)
                .value_name("VALUE")
                .help("Minimum step length [kpc]")
                .takes_value(true)
                .default_value("0.1"),
        )
        .arg(
            Arg::new("max-step")
                .long("max-step")
                .require_equals(true)
                .value_name("VALUE")
                .help("Maximum step length [kpc]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("fixed-step")
                .long("fixed-step")
                .require_equals(true)
                .value_name("VALUE")
                .help("Use this step length for all steps instead of adapting it [kpc]")
                .takes_value(true)
                .conflicts_with_all(&["min-step", "max-step"]),
        )
        .arg(
            Arg::new("renormalize-substeps")
                .long("renormalize-substeps")
                .help("Preserve the direction magnitude in every impulse of a trial step"),
        )
}

/// Sets monopole propagator parameters based on present arguments.
pub fn configure_stepping_from_arguments(
    config: &mut MonopolePropagatorConfig,
    arguments: &ArgMatches,
) {
    cli_utils::assign_value_from_parseable_argument(&mut config.tolerance, arguments, "tolerance");

    if let Some(fixed_step) =
        cli_utils::get_finite_float_value_from_parseable_argument::<f64>(arguments, "fixed-step")
    {
        config.min_step = fixed_step * KPC;
        config.max_step = fixed_step * KPC;
    } else {
        config.min_step =
            cli_utils::get_finite_float_value_from_required_parseable_argument::<f64>(
                arguments, "min-step",
            ) * KPC;
        config.max_step =
            cli_utils::get_finite_float_value_from_required_parseable_argument::<f64>(
                arguments, "max-step",
            ) * KPC;
    }
    config.renormalize_substeps = arguments.is_present("renormalize-substeps");
}

/// Creates a monopole propagator based on the present arguments.
pub fn construct_propagator_from_arguments(
    sampler: FieldSampler,
    arguments: &ArgMatches,
) -> MonopolePropagator {
    let mut config = MonopolePropagatorConfig::default();
    configure_stepping_from_arguments(&mut config, arguments);
    exit_on_error!(
        MonopolePropagator::new(sampler, config),
        "Error: Invalid stepping parameters: {}"
    )
}
