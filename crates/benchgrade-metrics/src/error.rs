use thiserror::Error;

/// Error types for metric computations.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    /// The two inputs of a metric do not have the same number of samples.
    #[error("Mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedLengths {
        /// Label for the left-hand slice.
        left_name: &'static str,
        /// Length of the left-hand slice.
        left_len: usize,
        /// Label for the right-hand slice.
        right_name: &'static str,
        /// Length of the right-hand slice.
        right_len: usize,
    },

    /// The metric is undefined for zero samples.
    #[error("Cannot compute {0} on empty input")]
    EmptyInput(&'static str),

    /// Only one class is present in the ground truth.
    #[error("Only one class present in y_true, ROC AUC score is not defined in that case")]
    SingleClass,

    /// An input contains NaN or infinity.
    #[error("Input {0} contains NaN or infinity")]
    NonFinite(&'static str),

    /// The weights of a weighted average sum to zero.
    #[error("The sum of the weights is zero")]
    ZeroWeight,
}

pub(crate) fn check_lengths(
    left_name: &'static str,
    left_len: usize,
    right_name: &'static str,
    right_len: usize,
) -> Result<(), MetricsError> {
    if left_len != right_len {
        return Err(MetricsError::MismatchedLengths {
            left_name,
            left_len,
            right_name,
            right_len,
        });
    }
    Ok(())
}

pub(crate) fn check_finite(name: &'static str, values: &[f64]) -> Result<(), MetricsError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MetricsError::NonFinite(name));
    }
    Ok(())
}
