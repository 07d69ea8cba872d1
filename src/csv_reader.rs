//! CSV record reading over a line source
//!
//! A record may span several physical lines when a quoted field contains
//! line breaks. [`CsvReader::read_record`] keeps pulling lines until the
//! scanner reports the record complete.

use crate::config::CsvConfig;
use crate::csv::{CsvParser, FieldAssembler, ScanOutcome, ScanState};
use crate::error::{CsvError, Result};
use crate::source::{LineReader, LineSource};
use crate::types::{Headers, Record};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming CSV record reader
///
/// Reads records one at a time from any [`LineSource`]. Quoted fields may
/// contain delimiters, doubled quotes and line breaks. Memory use is bounded
/// by the size of the largest record.
///
/// Field values are trimmed of surrounding whitespace, quoted or not.
///
/// # Examples
///
/// ```
/// use csvstream::CsvReader;
///
/// let mut reader = CsvReader::from_text("a,\"b\r\nc\",d\ne,f,g");
///
/// let first = reader.read_record().unwrap().unwrap();
/// assert_eq!(first.as_slice(), ["a", "b\nc", "d"]);
///
/// let second = reader.read_record().unwrap().unwrap();
/// assert_eq!(second.as_slice(), ["e", "f", "g"]);
///
/// assert!(reader.read_record().unwrap().is_none());
/// ```
///
/// # With Headers
///
/// ```
/// use csvstream::{CsvConfig, CsvReader};
///
/// let config = CsvConfig::default().has_header(true);
/// let mut reader = CsvReader::with_config(
///     csvstream::LineReader::new("id,name\n1,Alice".as_bytes()),
///     config,
/// )
/// .unwrap();
///
/// let row = reader.read_record().unwrap().unwrap();
/// let headers = reader.headers().unwrap();
/// assert_eq!(headers.get(&row, "name"), Some("Alice"));
/// ```
pub struct CsvReader<S> {
    source: S,

    // Parser state
    parser: CsvParser,
    assembler: FieldAssembler,
    state: ScanState,
    line_number: usize,
    record_count: u64,

    // Configuration
    config: CsvConfig,
    headers: Option<Headers>,
}

impl<S: LineSource> CsvReader<S> {
    /// Create a reader with the default dialect (`,` and `"`)
    pub fn new(source: S) -> Self {
        Self::build(source, CsvConfig::default())
    }

    /// Create a reader with a custom dialect
    ///
    /// Fails with [`CsvError::InvalidConfig`] when the delimiter and quote
    /// are the same character or either one is a line terminator.
    pub fn with_config(source: S, config: CsvConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(source, config))
    }

    fn build(source: S, config: CsvConfig) -> Self {
        CsvReader {
            source,
            parser: CsvParser::from_config(&config),
            assembler: FieldAssembler::new(),
            state: ScanState::Normal,
            line_number: 0,
            record_count: 0,
            config,
            headers: None,
        }
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` when the source is exhausted between records.
    /// Fails with [`CsvError::UnterminatedRecord`] when the source ends
    /// inside a quoted field; the reader is reset afterwards and the next
    /// call returns `Ok(None)`.
    ///
    /// With `has_header` set, the first record is stored as headers and the
    /// next one is returned.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if self.config.has_header && self.headers.is_none() {
            match self.next_record()? {
                Some(header) => {
                    debug!("header row captured: {} columns", header.len());
                    self.headers = Some(Headers::from_record(&header));
                }
                None => return Ok(None),
            }
        }

        let record = self.next_record()?;
        if record.is_some() {
            self.record_count += 1;
        }
        Ok(record)
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        debug_assert!(self.assembler.is_empty());
        let start_line = self.line_number + 1;

        loop {
            let line = match self.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return self.finish_at_eof(start_line),
                Err(e) => {
                    self.discard_partial();
                    return Err(e);
                }
            };
            self.line_number += 1;

            match self
                .parser
                .scan_line(&line, &mut self.assembler, &mut self.state)
            {
                ScanOutcome::Complete => {
                    let fields = self.assembler.take_fields();
                    debug!(
                        "record complete: lines {}-{}, {} fields",
                        start_line,
                        self.line_number,
                        fields.len()
                    );
                    return Ok(Some(Record::new(start_line, fields)));
                }
                ScanOutcome::Incomplete => continue,
            }
        }
    }

    fn finish_at_eof(&mut self, start_line: usize) -> Result<Option<Record>> {
        if self.line_number < start_line {
            return Ok(None);
        }

        // Only an open quote keeps a record going past the end of a line.
        let partial = self.assembler.take_partial();
        self.state = ScanState::Normal;
        warn!(
            "input ended inside a quoted field (record started on line {})",
            start_line
        );
        Err(CsvError::UnterminatedRecord {
            line: start_line,
            partial,
        })
    }

    fn discard_partial(&mut self) {
        self.assembler.reset();
        self.state = ScanState::Normal;
    }

    /// Get iterator over records
    ///
    /// The iterator stops after yielding the first error.
    pub fn records(&mut self) -> RecordIterator<'_, S> {
        RecordIterator {
            reader: self,
            failed: false,
        }
    }
}

impl<S> CsvReader<S> {
    /// Header row, once it has been read
    ///
    /// Returns `None` until the first call to [`read_record`](Self::read_record)
    /// when `has_header` is set, and always when it is not.
    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Dialect in use
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Get the number of data records read so far (header excluded)
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Number of physical lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Borrow the underlying line source
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Unwrap the underlying line source
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<R: Read> CsvReader<LineReader<R>> {
    /// Read records from a byte stream with the default dialect
    pub fn from_reader(reader: R) -> Self {
        CsvReader::new(LineReader::new(reader))
    }
}

impl<'a> CsvReader<LineReader<&'a [u8]>> {
    /// Read records from an in-memory string with the default dialect
    pub fn from_text(text: &'a str) -> Self {
        CsvReader::from_reader(text.as_bytes())
    }
}

impl CsvReader<LineReader<File>> {
    /// Open a CSV file with the default dialect
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv").unwrap();
    ///
    /// for record in reader.records() {
    ///     println!("{}", record.unwrap());
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            CsvError::ReadError(format!(
                "Failed to open CSV file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(CsvReader::from_reader(file))
    }

    /// Open a CSV file with a custom dialect
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: CsvConfig) -> Result<Self> {
        config.validate()?;
        let mut reader = Self::open(path)?;
        reader.parser = CsvParser::from_config(&config);
        reader.config = config;
        Ok(reader)
    }
}

/// Iterator over CSV records
pub struct RecordIterator<'a, S> {
    reader: &'a mut CsvReader<S>,
    failed: bool,
}

impl<'a, S: LineSource> Iterator for RecordIterator<'a, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IterLines;

    fn read_all<S: LineSource>(reader: &mut CsvReader<S>) -> Vec<Vec<String>> {
        reader
            .records()
            .map(|r| r.unwrap().into_fields())
            .collect()
    }

    #[test]
    fn test_single_record() {
        let mut reader = CsvReader::from_text("a,b,c");
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.as_slice(), ["a", "b", "c"]);
        assert_eq!(record.line(), 1);
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_sequential_records() {
        let mut reader = CsvReader::from_text("a,b\nc,d\ne,f\n");
        assert_eq!(
            read_all(&mut reader),
            vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]
        );
        assert_eq!(reader.record_count(), 3);
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn test_multiline_record_line_tracking() {
        let mut reader = CsvReader::new(IterLines::new(["x,\"1", "2", "3\"", "y"]));
        let first = reader.read_record().unwrap().unwrap();
        assert_eq!(first.as_slice(), ["x", "1\n2\n3"]);
        assert_eq!(first.line(), 1);
        assert_eq!(reader.line_number(), 3);

        let second = reader.read_record().unwrap().unwrap();
        assert_eq!(second.as_slice(), ["y"]);
        assert_eq!(second.line(), 4);
    }

    #[test]
    fn test_blank_line_is_empty_record() {
        let mut reader = CsvReader::from_text("a\n\nb");
        let records = read_all(&mut reader);
        assert_eq!(records.len(), 3);
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_unterminated_record() {
        let mut reader = CsvReader::from_text("ok\na,\"b\nc");
        assert_eq!(reader.read_record().unwrap().unwrap().as_slice(), ["ok"]);

        match reader.read_record() {
            Err(CsvError::UnterminatedRecord { line, partial }) => {
                assert_eq!(line, 2);
                assert_eq!(partial, vec!["a", "b\nc"]);
            }
            other => panic!("expected UnterminatedRecord, got {:?}", other),
        }

        // Reader is reset and reports end of input
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.record_count(), 1);
    }

    #[test]
    fn test_records_iterator_stops_after_error() {
        let mut reader = CsvReader::from_text("a\n\"open");
        let results: Vec<_> = reader.records().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_unterminated());
    }

    #[test]
    fn test_headers() {
        let config = CsvConfig::default().has_header(true);
        let source = IterLines::new(["id,name", "1,Alice", "2,Bob"]);
        let mut reader = CsvReader::with_config(source, config).unwrap();
        assert!(reader.headers().is_none());

        let rows = read_all(&mut reader);
        assert_eq!(rows, vec![vec!["1", "Alice"], vec!["2", "Bob"]]);

        let headers = reader.headers().unwrap();
        assert_eq!(headers.index_of("name"), Some(1));
        assert_eq!(reader.record_count(), 2);
    }

    #[test]
    fn test_headers_only() {
        let config = CsvConfig::default().has_header(true);
        let mut reader = CsvReader::with_config(IterLines::new(["a,b"]), config).unwrap();
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.headers().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let config = CsvConfig::default().quote_char(',');
        let result = CsvReader::with_config(IterLines::new(["a"]), config);
        assert!(matches!(result, Err(CsvError::InvalidConfig(_))));
    }

    #[test]
    fn test_source_error_propagates() {
        struct Failing;
        impl LineSource for Failing {
            fn next_line(&mut self) -> Result<Option<String>> {
                Err(CsvError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "source closed",
                )))
            }
        }

        let mut reader = CsvReader::new(Failing);
        assert!(matches!(reader.read_record(), Err(CsvError::Io(_))));
    }

    #[test]
    fn test_source_error_mid_record_resets_state() {
        struct Scripted(Vec<Option<&'static str>>);
        impl LineSource for Scripted {
            fn next_line(&mut self) -> Result<Option<String>> {
                match self.0.remove(0) {
                    Some(line) => Ok(Some(line.to_string())),
                    None => Err(CsvError::ReadError("interrupted".to_string())),
                }
            }
        }

        let source = Scripted(vec![Some("a,\"b"), None, Some("c,d")]);
        let mut reader = CsvReader::new(source);
        assert!(reader.read_record().is_err());
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.as_slice(), ["c", "d"]);
    }

    #[test]
    fn test_into_inner() {
        let mut reader = CsvReader::new(IterLines::new(["a", "b"]));
        reader.read_record().unwrap();
        let mut source = reader.into_inner();
        assert_eq!(source.next_line().unwrap().as_deref(), Some("b"));
    }
}
