//! Command line interface for the radiative energy loss.

use crate::{
    cli::utils as cli_utils,
    exit_on_error,
    field::sampler::FieldSampler,
    radiation::{MonopoleRadiation, MonopoleRadiationConfig, RadiationFieldSource},
};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for parameters used by the radiation model.
pub fn add_radiation_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("no-radiation")
                .long("no-radiation")
                .help("Ignore radiative energy losses"),
        )
        .arg(
            Arg::new("loss-limit")
                .long("loss-limit")
                .require_equals(true)
                .value_name("VALUE")
                .help("Largest fraction of the energy that may be radiated in one step")
                .takes_value(true)
                .default_value("0.1"),
        )
}

/// Sets radiation parameters based on present arguments.
pub fn configure_radiation_from_arguments(
    config: &mut MonopoleRadiationConfig,
    arguments: &ArgMatches,
) {
    cli_utils::assign_value_from_parseable_argument(&mut config.limit, arguments, "loss-limit");
}

/// Creates the radiation model based on the present arguments, unless it
/// was disabled.
pub fn construct_radiation_from_arguments(
    sampler: FieldSampler,
    arguments: &ArgMatches,
) -> Option<MonopoleRadiation> {
    if arguments.is_present("no-radiation") {
        return None;
    }
    let mut config = MonopoleRadiationConfig::default();
    configure_radiation_from_arguments(&mut config, arguments);
    Some(exit_on_error!(
        MonopoleRadiation::new(RadiationFieldSource::Field(sampler), config),
        "Error: Invalid radiation parameters: {}"
    ))
}
