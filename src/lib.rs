//! # csvstream
//!
//! Incremental CSV record parser. Records are read one at a time from a
//! line source; quoted fields may contain delimiters, doubled quotes and
//! line breaks that span several physical lines.
//!
//! ## Features
//!
//! - **Multi-line quoted fields**: a line break inside quotes becomes a
//!   single `'\n'` in the field, whatever the source terminator was
//! - **Custom dialects**: any delimiter and quote character
//! - **Pluggable input**: parse from files, byte streams or in-memory lines
//!   through the [`LineSource`] trait
//! - **Header rows**: optional header capture with lookup by column name
//!
//! ## Quick Start
//!
//! ```
//! use csvstream::CsvReader;
//!
//! let mut reader = CsvReader::from_text("name,quote\nAlice,\"She said \"\"hi\"\"\"");
//!
//! for record in reader.records() {
//!     let record = record.unwrap();
//!     println!("{}", record);
//! }
//! ```
//!
//! ## Custom dialect
//!
//! ```
//! use csvstream::{CsvConfig, CsvReader, IterLines};
//!
//! let config = CsvConfig::default().delimiter('|');
//! let mut reader = CsvReader::with_config(IterLines::new(["a|b|c"]), config).unwrap();
//!
//! let record = reader.read_record().unwrap().unwrap();
//! assert_eq!(record.as_slice(), ["a", "b", "c"]);
//! ```
//!
//! ## Whitespace
//!
//! Every field is trimmed of leading and trailing whitespace, including
//! quoted fields: `"  x  "` reads as `x`.

pub mod config;
pub mod csv;
pub mod csv_reader;
pub mod error;
pub mod source;
pub mod types;

pub use config::CsvConfig;
pub use csv_reader::{CsvReader, RecordIterator};
pub use error::{CsvError, Result};
pub use source::{IterLines, LineReader, LineSource};
pub use types::{Headers, Record};
