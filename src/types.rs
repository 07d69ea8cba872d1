//! Type definitions for parsed CSV data

use indexmap::IndexMap;
use std::fmt;
use std::ops::Index;

/// One parsed row: the fields of a record in column order
///
/// Records are immutable once returned by the reader. Indexing with `[]`
/// panics on an out-of-range column like a slice does; use [`get`](Self::get)
/// for a checked lookup.
///
/// # Examples
///
/// ```
/// use csvstream::CsvReader;
///
/// let mut reader = CsvReader::from_text("a,\"b,c\",d");
/// let record = reader.read_record().unwrap().unwrap();
///
/// assert_eq!(record.len(), 3);
/// assert_eq!(&record[1], "b,c");
/// assert_eq!(record.get(3), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Record {
    /// Create a record starting on the given physical line (1-based)
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Record { line, fields }
    }

    /// Physical line the record started on
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get field at column index
    pub fn get(&self, col: usize) -> Option<&str> {
        self.fields.get(col).map(String::as_str)
    }

    /// Get number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields (a blank line)
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.fields
    }

    /// Iterate over the fields in column order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Consume the record, returning its fields
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, col: usize) -> &str {
        &self.fields[col]
    }
}

impl IntoIterator for Record {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.fields)
    }
}

/// Column names taken from a header row
///
/// Maps each name to its column index. When a name repeats, the first
/// column wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Headers {
    columns: IndexMap<String, usize>,
}

impl Headers {
    /// Build headers from a header record
    pub fn from_record(record: &Record) -> Self {
        let mut columns = IndexMap::with_capacity(record.len());
        for (idx, name) in record.iter().enumerate() {
            columns.entry(name.to_string()).or_insert(idx);
        }
        Headers { columns }
    }

    /// Column index for a header name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Look up a field of `record` by header name
    pub fn get<'r>(&self, record: &'r Record, name: &str) -> Option<&'r str> {
        self.index_of(name).and_then(|idx| record.get(idx))
    }

    /// Header names in column order (duplicates removed)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no header names
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
