use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{check_finite, check_lengths, MetricsError};

/// Probabilities are clipped to `[LOG_LOSS_EPS, 1 - LOG_LOSS_EPS]` before taking logs.
pub const LOG_LOSS_EPS: f64 = f64::EPSILON;

/// Compute the fraction of predictions equal to the ground truth.
///
/// # Arguments
///
/// * `y_true` - The ground truth labels.
/// * `y_pred` - The predicted labels.
///
/// # Returns
///
/// The accuracy in `[0, 1]`.
pub fn accuracy<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_pred", y_pred.len())?;
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput("accuracy"));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Compute the Matthews correlation coefficient for binary or multiclass labels.
///
/// Uses the confusion matrix form
///
/// $ MCC = \frac{c \cdot s - \sum_k p_k t_k}{\sqrt{(s^2 - \sum_k p_k^2)(s^2 - \sum_k t_k^2)}} $
///
/// where `c` is the number of correct predictions, `s` the number of samples, `t_k`
/// the number of times class `k` truly occurred and `p_k` the number of times it was
/// predicted. Returns `0.0` when the denominator vanishes.
pub fn matthews_corrcoef<T: Eq + Hash>(y_true: &[T], y_pred: &[T]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_pred", y_pred.len())?;
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput("matthews correlation"));
    }

    let mut true_counts: HashMap<&T, f64> = HashMap::new();
    let mut pred_counts: HashMap<&T, f64> = HashMap::new();
    let mut correct = 0.0;
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        *true_counts.entry(t).or_default() += 1.0;
        *pred_counts.entry(p).or_default() += 1.0;
        if t == p {
            correct += 1.0;
        }
    }

    let s = y_true.len() as f64;
    let cross = true_counts
        .iter()
        .map(|(label, t_k)| t_k * pred_counts.get(label).copied().unwrap_or(0.0))
        .sum::<f64>();
    let sum_sq = |counts: &HashMap<&T, f64>| counts.values().map(|c| c * c).sum::<f64>();

    let cov_ytyp = correct * s - cross;
    let cov_ypyp = s * s - sum_sq(&pred_counts);
    let cov_ytyt = s * s - sum_sq(&true_counts);

    if cov_ypyp * cov_ytyt == 0.0 {
        return Ok(0.0);
    }

    Ok(cov_ytyp / (cov_ytyt * cov_ypyp).sqrt())
}

/// Compute the area under the ROC curve from binary labels and scores.
///
/// The area is obtained from the Mann-Whitney rank statistic, assigning tied scores
/// their average rank, which equals the trapezoidal area under the ROC curve.
///
/// # Errors
///
/// Returns [`MetricsError::SingleClass`] if `y_true` does not contain both classes.
pub fn roc_auc(y_true: &[bool], y_score: &[f64]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_score", y_score.len())?;
    check_finite("y_score", y_score)?;

    let n_pos = y_true.iter().filter(|&&t| t).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricsError::SingleClass);
    }

    let ranks = average_ranks(y_score);
    let pos_rank_sum = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|&(&t, _)| t)
        .map(|(_, r)| r)
        .sum::<f64>();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// One-based ranks of `values`, ties sharing the average of their ranks.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // ranks start..end (zero-based) become (start + 1 + end) / 2 one-based
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }

    ranks
}

/// Compute the mean negative log-likelihood of binary labels given `P(y = 1)`.
pub fn binary_log_loss(y_true: &[bool], y_prob: &[f64]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_prob", y_prob.len())?;
    check_finite("y_prob", y_prob)?;
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput("log loss"));
    }

    let total = y_true
        .iter()
        .zip(y_prob.iter())
        .map(|(&t, &p)| {
            let p = p.clamp(LOG_LOSS_EPS, 1.0 - LOG_LOSS_EPS);
            if t {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum::<f64>();

    Ok(total / y_true.len() as f64)
}

/// Compute the multiclass log-loss (cross entropy).
///
/// # Arguments
///
/// * `y_true` - One row per sample with the indicator (or soft) target of each class.
/// * `y_pred` - One row per sample with the predicted probability of each class.
///
/// Predictions are clipped to `[eps, 1 - eps]` and every row is renormalised to sum
/// to one before taking logs.
pub fn log_loss(y_true: &[Vec<f64>], y_pred: &[Vec<f64>]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_pred", y_pred.len())?;
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput("log loss"));
    }

    let mut total = 0.0;
    for (t_row, p_row) in y_true.iter().zip(y_pred.iter()) {
        check_lengths("y_true row", t_row.len(), "y_pred row", p_row.len())?;
        check_finite("y_true", t_row)?;
        check_finite("y_pred", p_row)?;

        let clipped = p_row
            .iter()
            .map(|p| p.clamp(LOG_LOSS_EPS, 1.0 - LOG_LOSS_EPS))
            .collect::<Vec<_>>();
        let norm = clipped.iter().sum::<f64>();

        total -= t_row
            .iter()
            .zip(clipped.iter())
            .map(|(t, p)| t * (p / norm).ln())
            .sum::<f64>();
    }

    Ok(total / y_true.len() as f64)
}
