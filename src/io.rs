//! Console output.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;

/// How much non-critical status output to produce.
#[derive(Clone)]
pub enum Verbosity {
    Quiet,
    Messages,
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Creates a progress bar for the given number of items, which
    /// is hidden unless progress output was requested.
    pub fn create_progress_bar(&self, n_items: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => ProgressBar::new(n_items as u64).with_style(style.clone()),
            _ => ProgressBar::hidden(),
        }
    }
}

impl fmt::Debug for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quiet => "Quiet",
            Self::Messages => "Messages",
            Self::Progress(_) => "Progress",
        })
    }
}
