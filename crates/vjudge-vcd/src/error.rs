//! Error types for VCD trace reading

use thiserror::Error;

/// Errors that can occur while reading a VCD trace
#[derive(Error, Debug)]
pub enum VcdError {
    /// The trace file could not be read
    #[error("failed to read VCD file: {0}")]
    Io(#[from] std::io::Error),

    /// The trace content does not follow the VCD grammar
    #[error("malformed VCD at line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

/// Result type for VCD operations
pub type Result<T> = std::result::Result<T, VcdError>;
