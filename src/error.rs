//! Error types for CSV reading

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while reading CSV records
#[derive(Debug, Error)]
pub enum CsvError {
    /// The underlying line source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input could not be opened or read
    #[error("Read error: {0}")]
    ReadError(String),

    /// A physical line was not valid UTF-8
    #[error("Invalid UTF-8 on line {line}")]
    InvalidUtf8 { line: usize },

    /// The delimiter/quote configuration cannot be parsed unambiguously
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input ended while a quoted field was still open.
    ///
    /// `line` is the physical line the record started on. `partial` holds
    /// the fields collected so far, including the unterminated one, so a
    /// caller can salvage them.
    #[error("Record starting on line {line} is not terminated: quoted field still open at end of input")]
    UnterminatedRecord { line: usize, partial: Vec<String> },
}

impl CsvError {
    /// Physical line number associated with the error, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            CsvError::InvalidUtf8 { line } | CsvError::UnterminatedRecord { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    /// Returns `true` for the unterminated-record error
    pub fn is_unterminated(&self) -> bool {
        matches!(self, CsvError::UnterminatedRecord { .. })
    }
}
