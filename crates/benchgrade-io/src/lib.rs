#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// JSON and line oriented readers.
pub mod json;

/// Scoped writer for grading outcomes.
pub mod result_log;

/// Delimited text tables.
pub mod table;

pub use error::IoError;
pub use json::{read_json, read_jsonl, read_lines};
pub use result_log::ResultLog;
pub use table::Table;
