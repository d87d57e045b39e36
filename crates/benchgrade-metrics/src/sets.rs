use std::collections::HashSet;
use std::hash::Hash;

use crate::error::{check_lengths, MetricsError};

/// F1 score between a true and a predicted label set.
///
/// Two empty sets agree perfectly and score `1.0`.
pub fn set_f1<T: Eq + Hash>(true_set: &HashSet<T>, pred_set: &HashSet<T>) -> f64 {
    if true_set.is_empty() && pred_set.is_empty() {
        return 1.0;
    }

    let tp = true_set.intersection(pred_set).count() as f64;
    let fp = pred_set.difference(true_set).count() as f64;
    let fn_ = true_set.difference(pred_set).count() as f64;

    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };

    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Mean of [`set_f1`] over aligned rows of label sets.
pub fn mean_set_f1<T: Eq + Hash>(
    true_sets: &[HashSet<T>],
    pred_sets: &[HashSet<T>],
) -> Result<f64, MetricsError> {
    check_lengths("true_sets", true_sets.len(), "pred_sets", pred_sets.len())?;
    if true_sets.is_empty() {
        return Err(MetricsError::EmptyInput("mean set f1"));
    }

    let total = true_sets
        .iter()
        .zip(pred_sets.iter())
        .map(|(t, p)| set_f1(t, p))
        .sum::<f64>();

    Ok(total / true_sets.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn set(items: &[&'static str]) -> HashSet<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_set_f1() {
        assert_eq!(set_f1(&set(&[]), &set(&[])), 1.0);
        assert_eq!(set_f1(&set(&["amecro"]), &set(&[])), 0.0);
        assert_eq!(set_f1(&set(&["a", "b"]), &set(&["a", "b"])), 1.0);
        // precision 1/2, recall 1/1
        assert_relative_eq!(set_f1(&set(&["a"]), &set(&["a", "b"])), 2.0 / 3.0);
    }

    #[test]
    fn test_mean_set_f1() -> Result<(), MetricsError> {
        let truth = vec![set(&[]), set(&["a"])];
        let pred = vec![set(&[]), set(&["b"])];
        assert_relative_eq!(mean_set_f1(&truth, &pred)?, 0.5);
        Ok(())
    }
}
