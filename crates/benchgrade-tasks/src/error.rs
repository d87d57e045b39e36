use benchgrade_io::IoError;
use benchgrade_metrics::MetricsError;
use benchgrade_pose::PoseError;
use thiserror::Error;

/// Error types for grading a submission.
#[derive(Debug, Error)]
pub enum GradeError {
    /// The submission does not follow the expected format and cannot be graded.
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// The answers file does not follow the expected format.
    #[error("Invalid answers: {0}")]
    InvalidAnswers(String),

    /// The task name does not match any grader.
    #[error("Unknown task `{0}`")]
    UnknownTask(String),

    /// Error reading an input file.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error computing the metric.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Error evaluating camera poses.
    #[error(transparent)]
    Pose(#[from] PoseError),
}

impl GradeError {
    /// Check if the error is the participant's fault rather than a grading problem.
    pub fn is_submission_error(&self) -> bool {
        matches!(self, Self::InvalidSubmission(_))
    }
}
