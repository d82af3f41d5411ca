//! Utilities for creating the command line interface.

use crate::{
    exit_on_error, exit_on_false,
    geometry::{Dim3, In3D},
    io::Verbosity,
    num::BFloat,
};
use clap::ArgMatches;
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::str::FromStr;

lazy_static! {
    static ref DEFAULT_PROGRESS_STYLE: ProgressStyle = ProgressStyle::default_bar()
        .template("Progress: {bar:40}  {percent}% | ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.trim().parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn parse_value_strings<'a, 'b, T, I>(argument_name: &'a str, value_strings: I) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
    I: Iterator<Item = &'b str>,
{
    value_strings
        .filter_map(|value_string| {
            if value_string.is_empty() {
                None
            } else {
                Some(parse_value_string(argument_name, value_string))
            }
        })
        .collect()
}

fn verify_finite_float_value<F: BFloat>(argument_name: &str, value: F) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        arguments
            .value_of(argument_name)
            .expect("No value for required argument"),
    )
}

pub fn get_finite_float_value_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> F
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let value: F = get_value_from_required_parseable_argument(arguments, argument_name);
    verify_finite_float_value(argument_name, value);
    value
}

pub fn get_value_from_parseable_argument<T>(arguments: &ArgMatches, argument_name: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .value_of(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

pub fn get_finite_float_value_from_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<F>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let value = get_value_from_parseable_argument(arguments, argument_name);
    if let Some(value) = value {
        verify_finite_float_value(argument_name, value);
    }
    value
}

/// Overwrites the given value with the value of the argument if present.
pub fn assign_value_from_parseable_argument<T>(
    value: &mut T,
    arguments: &ArgMatches,
    argument_name: &str,
) where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    if let Some(parsed_value) = get_value_from_parseable_argument(arguments, argument_name) {
        *value = parsed_value;
    }
}

pub fn get_finite_float_values_from_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<Vec<F>>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let values = arguments
        .values_of(argument_name)
        .map(|values| parse_value_strings(argument_name, values));
    if let Some(values) = values.as_ref() {
        values
            .iter()
            .for_each(|&value| verify_finite_float_value(argument_name, value))
    };
    values
}

/// Parses three comma-separated finite values, if the argument is present.
pub fn parse_finite_3d_values<F>(arguments: &ArgMatches, argument_name: &str) -> Option<In3D<F>>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    get_finite_float_values_from_parseable_argument(arguments, argument_name).map(|values| {
        verify_argument_value_count(argument_name, &values, 3);
        In3D::with_each_component(|dim: Dim3| values[dim.num()])
    })
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.is_present("progress") {
        Verbosity::Progress(DEFAULT_PROGRESS_STYLE.clone())
    } else if arguments.is_present("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}
