//! Line sources feeding the record parser
//!
//! The parser never touches bytes or files directly. It asks a
//! [`LineSource`] for the next decoded line, with the terminator already
//! removed, until the source reports end of input.

use crate::error::{CsvError, Result};
use std::io::{BufRead, BufReader, ErrorKind, Read};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Something that yields decoded text lines without their terminators
///
/// `Ok(None)` signals end of input. LF, CR and CRLF must all be treated as
/// a single line boundary.
pub trait LineSource {
    /// Return the next line, or `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

/// Buffered line reader over any byte stream
///
/// Splits on LF, CR and CRLF, validates UTF-8 and drops a UTF-8 byte order
/// mark at the start of the stream.
///
/// # Examples
///
/// ```
/// use csvstream::{LineReader, LineSource};
///
/// let mut lines = LineReader::new("one\r\ntwo\rthree\n".as_bytes());
/// assert_eq!(lines.next_line().unwrap().as_deref(), Some("one"));
/// assert_eq!(lines.next_line().unwrap().as_deref(), Some("two"));
/// assert_eq!(lines.next_line().unwrap().as_deref(), Some("three"));
/// assert_eq!(lines.next_line().unwrap(), None);
/// ```
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
    // Previous line ended in CR; a leading LF belongs to that terminator.
    skip_lf: bool,
}

impl<R: Read> LineReader<R> {
    /// Create a new line reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(8 * 1024, reader)
    }

    /// Create with a specific buffer capacity
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        LineReader {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: Vec::with_capacity(256),
            skip_lf: false,
        }
    }

    /// Number of lines returned so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Fill `self.buffer` with the next raw line. Returns `false` at EOF.
    fn read_raw_line(&mut self) -> Result<bool> {
        self.buffer.clear();
        let mut has_line = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CsvError::Io(e)),
            };

            if available.is_empty() {
                return Ok(has_line);
            }

            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }

            has_line = true;
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    self.skip_lf = available[pos] == b'\r';
                    self.buffer.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buffer.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: Read> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        if !self.read_raw_line()? {
            return Ok(None);
        }
        self.line_number += 1;

        let mut bytes = self.buffer.as_slice();
        if self.line_number == 1 {
            bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        }

        let line = std::str::from_utf8(bytes).map_err(|_| CsvError::InvalidUtf8 {
            line: self.line_number,
        })?;
        Ok(Some(line.to_string()))
    }
}

/// In-memory line source over an iterator of already-split lines
///
/// # Examples
///
/// ```
/// use csvstream::{IterLines, LineSource};
///
/// let mut lines = IterLines::new(["a,b", "c,d"]);
/// assert_eq!(lines.next_line().unwrap().as_deref(), Some("a,b"));
/// ```
pub struct IterLines<I> {
    iter: I,
}

impl<I> IterLines<I> {
    /// Wrap anything iterable whose items convert into `String`
    pub fn new<T>(lines: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        IterLines {
            iter: lines.into_iter(),
        }
    }
}

impl<I, S> LineSource for IterLines<I>
where
    I: Iterator<Item = S>,
    S: Into<String>,
{
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.iter.next().map(Into::into))
    }
}
