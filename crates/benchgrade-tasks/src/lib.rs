#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Audio tasks.
pub mod audio;

/// Error types for grading.
pub mod error;

/// Loading and dispatch of the graders.
pub mod grade;

/// Graph tasks.
pub mod graph;

/// Image tasks.
pub mod image;

/// Multimodal tasks.
pub mod multimodal;

/// Tabular tasks.
pub mod tabular;

/// Task names.
pub mod task;

/// Text tasks.
pub mod text;

mod validate;

pub use error::GradeError;
pub use grade::{grade, grade_tables, GradeReport};
pub use task::{Difficulty, Modality, Task};
