//! Function for building the command line hierarchy.

use super::propagate::create_propagate_subcommand;
use clap::{self, Arg, Command};

/// Build the `monoprop` command line hierarchy.
pub fn build() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .subcommand(create_propagate_subcommand())
}
