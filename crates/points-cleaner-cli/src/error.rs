//! Error types for pointsctl

use std::path::PathBuf;

use points_cleaner::CleanerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] CleanerError),

    #[error("Unsupported config format for {0} (expected .json, .yaml or .yml)")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Invalid sample on line {line}: {reason}")]
    InvalidSample { line: usize, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::IoError(_) => 1,
            CliError::InvalidConfiguration(_)
            | CliError::UnsupportedConfigFormat(_)
            | CliError::JsonError(_)
            | CliError::YamlError(_) => 2,
            CliError::InvalidSample { .. } => 3,
        }
    }
}
