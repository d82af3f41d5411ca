//! Command line interface for specifying the magnetic field.

use crate::{
    cli::utils as cli_utils,
    exit_on_error, exit_with_error,
    field::{
        sampler::FieldSampler,
        single_mode::{
            PolarizationConvention, PolarizationMode, PolarizedSingleModeMagneticField,
            StrengthNormalization,
        },
        uniform::UniformMagneticField,
        MagneticField,
    },
    geometry::{Point3, Vec3},
    propagation::fpr,
    units::{KPC, NANO_GAUSS},
};
use clap::{Arg, ArgMatches, Command};
use std::sync::Arc;

/// Adds arguments for specifying the magnetic field.
pub fn add_field_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("field")
                .long("field")
                .require_equals(true)
                .value_name("TYPE")
                .help("Type of magnetic field to propagate through")
                .takes_value(true)
                .possible_values(["uniform", "single_mode", "none"])
                .default_value("uniform"),
        )
        .arg(
            Arg::new("field-strength")
                .long("field-strength")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Strength of the magnetic field [nG]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("field-direction")
                .long("field-direction")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X,Y,Z")
                .help("Direction of the uniform magnetic field")
                .takes_value(true)
                .number_of_values(3)
                .default_value("0,0,1"),
        )
        .arg(
            Arg::new("wavelength")
                .long("wavelength")
                .require_equals(true)
                .value_name("VALUE")
                .help("Wavelength of the single-mode magnetic field [kpc]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("polarization")
                .long("polarization")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Polarization parameter of the single-mode magnetic field, in [-1, 1]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("rms-strength")
                .long("rms-strength")
                .help("Interpret the single-mode field strength as RMS instead of amplitude"),
        )
}

/// Creates a field sampler based on the present arguments.
pub fn construct_field_sampler_from_arguments(arguments: &ArgMatches) -> FieldSampler {
    let strength = cli_utils::get_finite_float_value_from_required_parseable_argument::<fpr>(
        arguments,
        "field-strength",
    ) * NANO_GAUSS;

    let field: Arc<dyn MagneticField> = match arguments
        .value_of("field")
        .expect("No value for argument with default")
    {
        "none" => return FieldSampler::absent(),
        "uniform" => {
            let direction = cli_utils::parse_finite_3d_values::<fpr>(arguments, "field-direction")
                .expect("No value for argument with default");
            let (x, y, z) = direction.to_tuple();
            let direction = Vec3::new(x, y, z).normalized().unwrap_or_else(|| {
                exit_with_error!("Error: field-direction can not be zero")
            });
            Arc::new(UniformMagneticField::new(direction * strength))
        }
        "single_mode" => {
            let wavelength = cli_utils::get_finite_float_value_from_required_parseable_argument::<
                fpr,
            >(arguments, "wavelength")
                * KPC;
            let polarization = cli_utils::get_finite_float_value_from_required_parseable_argument(
                arguments,
                "polarization",
            );
            let mode = if polarization == 0.0 {
                PolarizationMode::Linear
            } else if fpr::abs(polarization) == 1.0 {
                PolarizationMode::Circular
            } else {
                PolarizationMode::Elliptical
            };
            let normalization = if arguments.is_present("rms-strength") {
                StrengthNormalization::Rms
            } else {
                StrengthNormalization::Amplitude
            };
            Arc::new(exit_on_error!(
                PolarizedSingleModeMagneticField::new(
                    strength,
                    wavelength,
                    polarization,
                    Point3::origin(),
                    &Vec3::new(1.0, 0.0, 0.0),
                    &Vec3::new(0.0, 1.0, 0.0),
                    normalization,
                    PolarizationConvention::Polarization,
                    mode,
                ),
                "Error: Invalid single-mode field: {}"
            ))
        }
        field_type => exit_with_error!("Error: Unsupported field type {}", field_type),
    };
    FieldSampler::new(field)
}
