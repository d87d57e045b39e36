use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::IoError;

/// Separator between the score and the message in a successful result log.
pub const SCORE_SEPARATOR: &str = "###";

/// Destination of a grading outcome read back by the leaderboard.
///
/// A successful run writes `"{score}###{message}"`; a failed run writes the
/// error message alone. The file is created when the outcome is written and
/// closed before the write call returns, so holding a `ResultLog` never keeps
/// a file handle open.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    /// Create a result log that will be written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a score together with an informative message.
    pub fn write_success(&self, score: f64, message: &str) -> Result<(), IoError> {
        self.write(&format!("{score}{SCORE_SEPARATOR}{message}"))
    }

    /// Write the reason why a submission could not be graded.
    pub fn write_failure(&self, message: &str) -> Result<(), IoError> {
        self.write(message)
    }

    fn write(&self, content: &str) -> Result<(), IoError> {
        let mut file = File::create(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        log::debug!("result written to {}", self.path.display());
        Ok(())
    }
}
