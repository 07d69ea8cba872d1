//! Line-by-line CSV scanning with quoted fields that may span lines
//!
//! [`CsvParser`] scans one physical line at a time into a [`FieldAssembler`].
//! Whether a quoted field is still open at the end of a line is carried to
//! the next call in an explicit [`ScanState`].
//!
//! Every finished field is trimmed of leading and trailing whitespace,
//! including fields that were quoted: `"  x  "` yields `x`.

use crate::config::CsvConfig;
use log::trace;
use std::iter::Peekable;
use std::str::Chars;

/// Quote state carried from one physical line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Outside any quoted region
    #[default]
    Normal,
    /// A quoted field was opened and not yet closed
    InQuote,
}

/// Result of scanning one physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The line ended outside quotes; the record is complete
    Complete,
    /// The line ended inside a quoted field; the record continues
    Incomplete,
}

/// Field buffer plus the fields finished so far for the current record
#[derive(Debug, Default)]
pub struct FieldAssembler {
    field: String,
    fields: Vec<String>,
}

impl FieldAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character to the current field
    #[inline]
    pub fn push_char(&mut self, ch: char) {
        self.field.push(ch);
    }

    /// Trim the current field, move it to the finished list and clear the buffer
    pub fn finish_field(&mut self) {
        self.fields.push(self.field.trim().to_string());
        self.field.clear();
    }

    /// Finish the current field only if it holds content.
    ///
    /// An empty trailing field (`a,` or `a,""`) is dropped.
    pub fn finish_trailing_field(&mut self) {
        if !self.field.is_empty() {
            self.finish_field();
        }
    }

    /// Move the finished fields out, leaving the list empty
    pub fn take_fields(&mut self) -> Vec<String> {
        debug_assert!(self.field.is_empty(), "field buffer not flushed");
        std::mem::take(&mut self.fields)
    }

    /// Best-effort salvage of an interrupted record; leaves the assembler empty
    pub fn take_partial(&mut self) -> Vec<String> {
        self.finish_trailing_field();
        std::mem::take(&mut self.fields)
    }

    /// Discard any buffered content
    pub fn reset(&mut self) {
        self.field.clear();
        self.fields.clear();
    }

    /// Number of fields finished for the current record
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.field.is_empty() && self.fields.is_empty()
    }
}

/// CSV line scanner for a fixed delimiter and quote character
#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    delimiter: char,
    quote_char: char,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::from_config(&CsvConfig::default())
    }
}

impl CsvParser {
    /// Create a new CSV parser with custom delimiter and quote character
    pub fn new(delimiter: char, quote_char: char) -> Self {
        Self {
            delimiter,
            quote_char,
        }
    }

    /// Create a parser for the dialect in `config`
    pub fn from_config(config: &CsvConfig) -> Self {
        Self::new(config.delimiter, config.quote)
    }

    /// Scan one physical line (terminator already stripped).
    ///
    /// When `state` is [`ScanState::InQuote`] the line continues a quoted
    /// field from the previous line: the consumed line break is added to the
    /// field as a single `'\n'` before scanning resumes inside the quotes.
    pub fn scan_line(
        &self,
        line: &str,
        record: &mut FieldAssembler,
        state: &mut ScanState,
    ) -> ScanOutcome {
        let mut chars = line.chars().peekable();

        if *state == ScanState::InQuote {
            trace!("quoted field continues onto next line");
            record.push_char('\n');
            if !self.scan_quoted(&mut chars, record) {
                return ScanOutcome::Incomplete;
            }
            *state = ScanState::Normal;
        }

        while let Some(ch) = chars.next() {
            if ch == self.delimiter {
                record.finish_field();
            } else if ch == self.quote_char {
                if !self.scan_quoted(&mut chars, record) {
                    *state = ScanState::InQuote;
                    return ScanOutcome::Incomplete;
                }
            } else {
                record.push_char(ch);
            }
        }

        record.finish_trailing_field();
        ScanOutcome::Complete
    }

    /// Consume characters inside quotes. Returns `true` once the closing
    /// quote is seen, `false` if the line runs out first.
    fn scan_quoted(&self, chars: &mut Peekable<Chars<'_>>, record: &mut FieldAssembler) -> bool {
        while let Some(ch) = chars.next() {
            if ch == self.quote_char {
                // Doubled quote is a literal quote
                if chars.next_if_eq(&self.quote_char).is_some() {
                    record.push_char(self.quote_char);
                    continue;
                }
                return true;
            }
            record.push_char(ch);
        }
        false
    }
}
