use benchgrade_io::IoError;
use thiserror::Error;

/// Error types for pose evaluation.
#[derive(Debug, Error)]
pub enum PoseError {
    /// Error reading a pose table.
    #[error(transparent)]
    Io(#[from] IoError),

    /// A pose table lacks required columns.
    #[error("{table} missing required columns: {columns:?}")]
    MissingColumns {
        /// Which input the table came from.
        table: String,
        /// The absent column names.
        columns: Vec<String>,
    },

    /// An image identifier appears more than once.
    #[error("{table} has duplicate image_id {id}")]
    DuplicateId {
        /// Which input the table came from.
        table: String,
        /// The repeated identifier.
        id: String,
    },

    /// A sampled triplet search needs at least one iteration.
    #[error("The sampled triplet search needs at least one iteration")]
    EmptySampleBudget,

    /// The distance threshold must be a positive finite number.
    #[error("Invalid inlier threshold {0}, expected a positive number")]
    InvalidThreshold(f64),
}
