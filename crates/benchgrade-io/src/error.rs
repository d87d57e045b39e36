/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode a JSON document.
    #[error("Failed to decode the json document. {0}")]
    JsonError(#[from] serde_json::Error),

    /// The delimited text is malformed.
    #[error("Parse error at line {line}: {msg}")]
    ParseError {
        /// One-based line number where the error was found.
        line: usize,
        /// Description of the problem.
        msg: String,
    },

    /// The file has no header row.
    #[error("The table is empty, a header row is required")]
    EmptyTable,

    /// A record does not have as many fields as the header.
    #[error("Row {row} has {actual} fields but the header has {expected}")]
    RaggedRow {
        /// Zero-based record index (header excluded).
        row: usize,
        /// Number of fields in the header.
        expected: usize,
        /// Number of fields in the record.
        actual: usize,
    },

    /// A requested column is not in the header.
    #[error("Missing column `{0}`")]
    MissingColumn(String),

    /// A cell could not be interpreted with the requested type.
    #[error("Invalid value `{value}` in column `{column}` at row {row}, expected {expected}")]
    InvalidValue {
        /// Column name.
        column: String,
        /// Zero-based record index.
        row: usize,
        /// Raw cell content.
        value: String,
        /// Name of the expected type.
        expected: &'static str,
    },
}
