//! Output formatting and logging setup
//!
//! This module provides the log subscriber configuration and the
//! formatting of errors shown to the user.

use tracing_subscriber::EnvFilter;

use crate::error::StepError;

/// Status message prefixes
pub mod status {
    /// Error prefix (red X)
    pub const ERROR: &str = "✗";
}

/// Default log level for a `-v` count
pub fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the `-v` count when set.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(log_level(verbose).into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Exit code for an error that ended the run
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<StepError>()
        .map_or(1, StepError::exit_code)
}

/// Print an error to stderr
pub fn display_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", status::ERROR);
}
