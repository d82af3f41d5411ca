//! Command line interface for specifying the initial monopoles.

use crate::{
    cli::utils as cli_utils,
    constants::{C_SQUARED, G_DIRAC},
    exit_on_error,
    geometry::{Point3, Vec3},
    propagation::fpr,
    seeding::{DirectionDistribution, Source, SourceConfig},
    units::{EEV, GEV, KPC},
};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for parameters used by the monopole source.
pub fn add_source_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("n-particles")
                .short('n')
                .long("n-particles")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of monopoles to propagate")
                .takes_value(true)
                .default_value("100"),
        )
        .arg(
            Arg::new("energy")
                .long("energy")
                .require_equals(true)
                .value_name("VALUE")
                .help("Initial kinetic energy of the monopoles [EeV]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("mass")
                .long("mass")
                .require_equals(true)
                .value_name("VALUE")
                .help("Rest mass of the monopoles [GeV/c^2]")
                .takes_value(true)
                .default_value("1e3"),
        )
        .arg(
            Arg::new("magnetic-charge")
                .long("magnetic-charge")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Magnetic charge of the monopoles [Dirac charges]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("anti")
                .long("anti")
                .help("Propagate anti-monopoles, which have the opposite magnetic charge"),
        )
        .arg(
            Arg::new("position")
                .long("position")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X,Y,Z")
                .help("Initial position of the monopoles [kpc]")
                .takes_value(true)
                .number_of_values(3)
                .default_value("0,0,0"),
        )
        .arg(
            Arg::new("direction")
                .long("direction")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X,Y,Z")
                .help("Initial direction of all monopoles [default: isotropic]")
                .takes_value(true)
                .number_of_values(3),
        )
        .arg(
            Arg::new("redshift")
                .long("redshift")
                .require_equals(true)
                .value_name("VALUE")
                .help("Redshift of the monopoles")
                .takes_value(true)
                .default_value("0.0"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random initial directions [default: random]")
                .takes_value(true),
        )
}

/// Creates a monopole source based on the present arguments.
pub fn construct_source_from_arguments(arguments: &ArgMatches) -> Source {
    let energy = cli_utils::get_finite_float_value_from_required_parseable_argument::<fpr>(
        arguments, "energy",
    ) * EEV;
    let mass = cli_utils::get_finite_float_value_from_required_parseable_argument::<fpr>(
        arguments, "mass",
    ) * GEV
        / C_SQUARED;
    let magnetic_charge = cli_utils::get_finite_float_value_from_required_parseable_argument::<
        fpr,
    >(arguments, "magnetic-charge")
        * G_DIRAC;
    let id = if arguments.is_present("anti") {
        -SourceConfig::DEFAULT_ID
    } else {
        SourceConfig::DEFAULT_ID
    };

    let position = cli_utils::parse_finite_3d_values::<fpr>(arguments, "position")
        .expect("No value for argument with default");
    let (x, y, z) = position.to_tuple();
    let position = Point3::new(x * KPC, y * KPC, z * KPC);

    let directions = match cli_utils::parse_finite_3d_values::<fpr>(arguments, "direction") {
        Some(direction) => {
            let (x, y, z) = direction.to_tuple();
            DirectionDistribution::Fixed(Vec3::new(x, y, z))
        }
        None => DirectionDistribution::Isotropic,
    };

    let config = SourceConfig {
        id,
        energy,
        mass,
        magnetic_charge,
        position,
        redshift: cli_utils::get_finite_float_value_from_required_parseable_argument(
            arguments, "redshift",
        ),
        initial_step: SourceConfig::DEFAULT_INITIAL_STEP,
        directions,
        seed: cli_utils::get_value_from_parseable_argument(arguments, "seed"),
    };
    exit_on_error!(Source::new(config), "Error: Invalid source: {}")
}

/// Reads the number of monopoles to propagate.
pub fn get_particle_count_from_arguments(arguments: &ArgMatches) -> usize {
    cli_utils::get_value_from_required_parseable_argument(arguments, "n-particles")
}
