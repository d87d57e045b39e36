use crate::error::{check_finite, check_lengths, MetricsError};

/// Compute the average precision of a scored binary ranking.
///
/// $ AP = \sum_n (R_n - R_{n-1}) P_n $
///
/// where `P_n` and `R_n` are the precision and recall at the n-th distinct score
/// threshold, visited from the highest score down. Samples sharing a score enter
/// the ranking together. Returns `0.0` when there is no positive sample.
pub fn average_precision(y_true: &[bool], y_score: &[f64]) -> Result<f64, MetricsError> {
    check_lengths("y_true", y_true.len(), "y_score", y_score.len())?;
    check_finite("y_score", y_score)?;

    let total_pos = y_true.iter().filter(|&&t| t).count();
    if total_pos == 0 {
        return Ok(0.0);
    }

    let mut order = (0..y_score.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| y_score[b].total_cmp(&y_score[a]));

    let mut ap = 0.0;
    let mut tps = 0usize;
    let mut seen = 0usize;
    let mut prev_recall = 0.0;
    let mut i = 0;
    while i < order.len() {
        // consume every sample tied with the current threshold
        let threshold = y_score[order[i]];
        while i < order.len() && y_score[order[i]] == threshold {
            if y_true[order[i]] {
                tps += 1;
            }
            seen += 1;
            i += 1;
        }

        let precision = tps as f64 / seen as f64;
        let recall = tps as f64 / total_pos as f64;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
    }

    Ok(ap)
}

/// Compute the average precision of a ranked list of hits.
///
/// `hits[k]` tells whether the item at rank `k + 1` is relevant. The precision at
/// every hit is averaged over the number of hits in the list; a list without hits
/// scores `0.0`.
pub fn hit_average_precision(hits: &[bool]) -> f64 {
    let mut found = 0usize;
    let mut sum = 0.0;
    for (k, &hit) in hits.iter().enumerate() {
        if hit {
            found += 1;
            sum += found as f64 / (k + 1) as f64;
        }
    }

    if found == 0 {
        0.0
    } else {
        sum / found as f64
    }
}

/// Weighted mean of [`hit_average_precision`] over several queries.
pub fn weighted_mean_average_precision(
    queries: &[Vec<bool>],
    weights: &[f64],
) -> Result<f64, MetricsError> {
    check_lengths("queries", queries.len(), "weights", weights.len())?;

    let total_weight = weights.iter().sum::<f64>();
    if total_weight == 0.0 {
        return Err(MetricsError::ZeroWeight);
    }

    let total = queries
        .iter()
        .zip(weights.iter())
        .map(|(hits, w)| hit_average_precision(hits) * w)
        .sum::<f64>();

    Ok(total / total_weight)
}

/// Reciprocal of the one-based position of `target` in `predictions`.
///
/// Only the first `k` predictions are considered when `k` is given. Returns `0.0`
/// if the target is not found.
pub fn reciprocal_rank<S: PartialEq>(predictions: &[S], target: &S, k: Option<usize>) -> f64 {
    let limit = k.unwrap_or(predictions.len()).min(predictions.len());
    predictions[..limit]
        .iter()
        .position(|p| p == target)
        .map_or(0.0, |pos| 1.0 / (pos + 1) as f64)
}

/// Mean of [`reciprocal_rank`] over aligned prediction lists and targets.
pub fn mean_reciprocal_rank<S: PartialEq>(
    predictions: &[Vec<S>],
    targets: &[S],
    k: Option<usize>,
) -> Result<f64, MetricsError> {
    check_lengths("predictions", predictions.len(), "targets", targets.len())?;
    if targets.is_empty() {
        return Err(MetricsError::EmptyInput("mean reciprocal rank"));
    }

    let total = predictions
        .iter()
        .zip(targets.iter())
        .map(|(preds, target)| reciprocal_rank(preds, target, k))
        .sum::<f64>();

    Ok(total / targets.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_average_precision() -> Result<(), MetricsError> {
        let y_true = [false, false, true, true];
        let y_score = [0.1, 0.4, 0.35, 0.8];
        // ranking: 0.8 (+), 0.4 (-), 0.35 (+), 0.1 (-)
        let ap = average_precision(&y_true, &y_score)?;
        assert_relative_eq!(ap, 0.5 * 1.0 + 0.5 * (2.0 / 3.0), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_average_precision_ties_and_no_positive() -> Result<(), MetricsError> {
        let ap = average_precision(&[true, false], &[0.5, 0.5])?;
        assert_relative_eq!(ap, 0.5);
        assert_eq!(average_precision(&[false, false], &[0.1, 0.2])?, 0.0);
        Ok(())
    }

    #[test]
    fn test_hit_average_precision() {
        assert_relative_eq!(
            hit_average_precision(&[true, false, true, false]),
            (1.0 + 2.0 / 3.0) / 2.0
        );
        assert_eq!(hit_average_precision(&[false; 5]), 0.0);
    }

    #[test]
    fn test_weighted_map() -> Result<(), MetricsError> {
        let queries = vec![vec![true, false], vec![false, true], vec![false, false]];
        let map = weighted_mean_average_precision(&queries, &[1.0, 1.0, 0.0])?;
        assert_relative_eq!(map, 0.75);
        assert_eq!(
            weighted_mean_average_precision(&queries, &[0.0; 3]),
            Err(MetricsError::ZeroWeight)
        );
        Ok(())
    }

    #[test]
    fn test_reciprocal_rank() -> Result<(), MetricsError> {
        let preds = vec!["a", "b", "c"];
        assert_relative_eq!(reciprocal_rank(&preds, &"b", None), 0.5);
        assert_eq!(reciprocal_rank(&preds, &"c", Some(2)), 0.0);
        assert_eq!(reciprocal_rank(&preds, &"z", Some(100)), 0.0);

        let mrr = mean_reciprocal_rank(&[preds.clone(), preds], &["a", "c"], None)?;
        assert_relative_eq!(mrr, (1.0 + 1.0 / 3.0) / 2.0);
        Ok(())
    }
}
