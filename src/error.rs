use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Failed to load program: {0}")]
    LoadError(#[from] LoadError),

    #[error("Execution limit reached: {0} cycles")]
    ExecutionLimitReached(u64),

    #[error("Trace output error: {0}")]
    TraceError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Errors that abort loading a whole program or data image
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{0}': {1}")]
    FileReadError(PathBuf, #[source] std::io::Error),
}

/// Reasons a single line of a program file is skipped.
/// These never abort loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected 'address value' or 'address type value', found {0} field(s)")]
    FieldCount(usize),

    #[error("invalid hexadecimal number '{0}'")]
    InvalidHex(String),

    #[error("address {0:#010x} is not word aligned")]
    Misaligned(u32),

    #[error("address {0:#010x} is outside the store")]
    AddressOutOfBounds(u32),
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
