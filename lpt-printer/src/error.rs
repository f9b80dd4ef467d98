//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Spool file could not be persisted after all attempts
    #[error("Spool staging failed after {attempts} attempts: {source}")]
    Staging {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// Device subprocess could not be started
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Device copy exited unsuccessfully
    #[error("Device copy to {device} failed (exit {code:?}): {diagnostics}")]
    DeviceCopy {
        device: String,
        code: Option<i32>,
        diagnostics: String,
    },

    /// Unknown printer port name
    #[error("Invalid printer port: {0}")]
    InvalidPort(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
