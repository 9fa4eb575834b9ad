//! CLI error types with miette diagnostics.
//!
//! Only configuration problems end the process with a failure code. Errors
//! raised by the check itself are reported on stdout like every other
//! outcome.

use miette::Diagnostic;
use thiserror::Error;

use nvrcheck_config::ConfigError;
use nvrcheck_core::CoreError;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG: i32 = 1;
    /// A second Ctrl-C while the first one is still tearing down.
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration in {path}")]
    #[diagnostic(
        code(nvrcheck::config),
        help(
            "Fix or remove the configuration file, or unset the offending NVRCHECK_* variables.\n\
             Expected at: {path}"
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Check ────────────────────────────────────────────────────────
    #[error("A device reported by the NVR has no logical id ({device_id})")]
    #[diagnostic(
        code(nvrcheck::device_unkeyed),
        help("Every camera needs at least one entity with a logical id before it can be recorded.")
    )]
    DeviceUnkeyed { device_id: String },

    #[error("Could not write the snapshot file: {0}")]
    #[diagnostic(
        code(nvrcheck::snapshot),
        help("Check that the output directory exists and is writable, or set output_dir.")
    )]
    Snapshot(CoreError),

    #[error(transparent)]
    #[diagnostic(code(nvrcheck::check))]
    Check(CoreError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::CONFIG,
            Self::DeviceUnkeyed { .. } | Self::Snapshot(_) | Self::Check(_) => exit_code::SUCCESS,
        }
    }

    pub fn config(path: &std::path::Path, source: ConfigError) -> Self {
        Self::Config {
            path: path.display().to_string(),
            source,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceUnkeyed { device_id } => CliError::DeviceUnkeyed { device_id },
            err @ (CoreError::Snapshot { .. }
            | CoreError::OutputDir { .. }
            | CoreError::Xml { .. }) => CliError::Snapshot(err),
            other => CliError::Check(other),
        }
    }
}
