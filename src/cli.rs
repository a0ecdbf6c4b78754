//! CLI command implementations for Zone Wreck.

pub(crate) mod crosscut;
pub(crate) mod run;

mod output;

use std::error::Error;
use std::fmt;
use std::path::Path;

use clap::ValueEnum;

/// Output format for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

impl From<zonewreck::ConfigError> for CliError {
    fn from(e: zonewreck::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<zonewreck::RunError> for CliError {
    fn from(e: zonewreck::RunError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<zonewreck::replay::ReplayError> for CliError {
    fn from(e: zonewreck::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

/// Read a file, naming it in the error.
fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))
}
