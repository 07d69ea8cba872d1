//! CSV scanning primitives

mod parser;

pub use parser::{CsvParser, FieldAssembler, ScanOutcome, ScanState};
