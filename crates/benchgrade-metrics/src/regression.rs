use crate::error::{check_finite, check_lengths, MetricsError};

/// Compute the root mean squared error between two series.
///
/// # Arguments
///
/// * `y_true` - The ground truth values.
/// * `y_pred` - The predicted values.
///
/// # Returns
///
/// `sqrt(mean((y_true - y_pred)^2))`.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_pred", y_pred.len())?;
    check_finite("y_true", y_true)?;
    check_finite("y_pred", y_pred)?;
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput("rmse"));
    }

    let sse = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>();

    Ok((sse / y_true.len() as f64).sqrt())
}

/// Compute the mean of the per-column RMSE (MCRMSE).
///
/// Each item of `columns` is a `(y_true, y_pred)` pair for one target.
pub fn mean_columnwise_rmse(columns: &[(Vec<f64>, Vec<f64>)]) -> Result<f64, MetricsError> {
    if columns.is_empty() {
        return Err(MetricsError::EmptyInput("mean columnwise rmse"));
    }

    let total = columns
        .iter()
        .map(|(t, p)| rmse(t, p))
        .sum::<Result<f64, _>>()?;

    Ok(total / columns.len() as f64)
}

/// Compute the coefficient of determination.
///
/// $ R^2 = 1 - \frac{\sum (y - \hat y)^2}{\sum (y - \bar y)^2} $
///
/// A constant ground truth has no variance to explain and yields `f64::NEG_INFINITY`.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_pred", y_pred.len())?;
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput("r2 score"));
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>();
    let ss_tot = y_true.iter().map(|t| (t - mean).powi(2)).sum::<f64>();

    if ss_tot > 0.0 {
        Ok(1.0 - ss_res / ss_tot)
    } else {
        Ok(f64::NEG_INFINITY)
    }
}

/// Compute the mean R² over several targets, each clipped below at zero.
///
/// Returns the mean together with the clipped score of every column.
pub fn mean_clipped_r2(columns: &[(Vec<f64>, Vec<f64>)]) -> Result<(f64, Vec<f64>), MetricsError> {
    if columns.is_empty() {
        return Err(MetricsError::EmptyInput("mean r2"));
    }

    let scores = columns
        .iter()
        .map(|(t, p)| r2_score(t, p).map(|r2| if r2 > 0.0 { r2 } else { 0.0 }))
        .collect::<Result<Vec<_>, _>>()?;
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    Ok((mean, scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rmse() -> Result<(), MetricsError> {
        assert_relative_eq!(rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0])?, 0.0);
        assert_relative_eq!(rmse(&[0.0, 0.0], &[3.0, 4.0])?, 12.5f64.sqrt());
        assert!(matches!(
            rmse(&[1.0], &[f64::NAN]),
            Err(MetricsError::NonFinite("y_pred"))
        ));
        Ok(())
    }

    #[test]
    fn test_mean_columnwise_rmse() -> Result<(), MetricsError> {
        let columns = vec![
            (vec![0.0, 0.0], vec![1.0, 1.0]),
            (vec![0.0, 0.0], vec![3.0, 3.0]),
        ];
        assert_relative_eq!(mean_columnwise_rmse(&columns)?, 2.0);
        Ok(())
    }

    #[test]
    fn test_r2() -> Result<(), MetricsError> {
        let y_true = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(r2_score(&y_true, &y_true)?, 1.0);
        // predicting the mean explains nothing
        assert_relative_eq!(r2_score(&y_true, &[2.5; 4])?, 0.0);
        assert_eq!(r2_score(&[1.0, 1.0], &[1.0, 2.0])?, f64::NEG_INFINITY);
        Ok(())
    }

    #[test]
    fn test_mean_clipped_r2() -> Result<(), MetricsError> {
        let columns = vec![
            (vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]),
            (vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]),
            (vec![5.0, 5.0, 5.0], vec![5.0, 5.0, 5.0]),
        ];
        let (mean, scores) = mean_clipped_r2(&columns)?;
        assert_eq!(scores, vec![1.0, 0.0, 0.0]);
        assert_relative_eq!(mean, 1.0 / 3.0);
        Ok(())
    }
}
