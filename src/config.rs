//! Reader configuration

use crate::error::{CsvError, Result};

/// Dialect settings for a [`CsvReader`](crate::CsvReader)
///
/// Fixed once the reader is constructed.
///
/// # Examples
///
/// ```
/// use csvstream::CsvConfig;
///
/// let config = CsvConfig::default().delimiter('|').quote_char('\'');
/// assert_eq!(config.delimiter, '|');
/// assert_eq!(config.quote, '\'');
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CsvConfig {
    /// Field separator
    pub delimiter: char,
    /// Quoting and escaping character
    pub quote: char,
    /// Treat the first record as a header row
    pub has_header: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            has_header: false,
        }
    }
}

impl CsvConfig {
    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Indicate that the first row contains headers (builder pattern)
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Check that delimiter and quote can be told apart.
    ///
    /// Line terminators are rejected as well: a line source strips them, so
    /// the scanner would never see them.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.quote {
            return Err(CsvError::InvalidConfig(format!(
                "delimiter and quote must differ (both are {:?})",
                self.delimiter
            )));
        }
        for (name, ch) in [("delimiter", self.delimiter), ("quote", self.quote)] {
            if ch == '\n' || ch == '\r' {
                return Err(CsvError::InvalidConfig(format!(
                    "{} cannot be a line terminator ({:?})",
                    name, ch
                )));
            }
        }
        Ok(())
    }
}
