//! Error types and macros for fatal errors.

use thiserror::Error;

/// Reasons for refusing a propagation or field configuration.
///
/// These only arise while setting things up, never while a
/// candidate is being propagated.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    #[error("target error {0} not in range (0, 1]")]
    ToleranceOutOfRange(f64),

    #[error("minimum step {0} is negative")]
    NegativeMinimumStep(f64),

    #[error("minimum step {min_step} exceeds maximum step {max_step}")]
    MinimumStepExceedsMaximum { min_step: f64, max_step: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must be larger than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("invalid field configuration: {0}")]
    InvalidField(String),
}

/// Result type for configuration steps.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}
