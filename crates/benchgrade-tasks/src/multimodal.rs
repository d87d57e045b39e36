use benchgrade_io::Table;
use benchgrade_metrics::{mean_clipped_r2, mean_reciprocal_rank};

use crate::{
    error::GradeError,
    validate::{self, Side},
};

/// Number of ranked items considered per row of the recommendation task.
pub const MRR_CUTOFF: usize = 100;

/// Plant traits predicted by the regression task, in submission column order.
pub const TRAITS: [&str; 6] = ["X4", "X11", "X18", "X26", "X50", "X3112"];

/// Grade next item recommendations with MRR@100.
///
/// Rows are matched by position. The `predictions` cell is a list literal such
/// as `['B07X', 'B08Y']` or `[12, 7]`; quotes around the items are ignored.
pub fn grade_medium(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const PREDICTIONS: &str = "predictions";
    const TARGET: &str = "next_item";

    validate::require_columns(submission, &[PREDICTIONS], Side::Submission)?;
    validate::require_columns(answers, &[TARGET], Side::Answers)?;
    validate::require_same_length(submission, answers)?;

    let predictions = submission
        .column(PREDICTIONS)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            parse_list_literal(cell).ok_or_else(|| {
                GradeError::InvalidSubmission(format!(
                    "row {row}: `{PREDICTIONS}` is not a list literal: {cell}"
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let targets = answers
        .column(TARGET)?
        .into_iter()
        .map(|t| unquote(t.trim()))
        .collect::<Vec<_>>();

    Ok(mean_reciprocal_rank(&predictions, &targets, Some(MRR_CUTOFF))?)
}

/// Split a `[a, 'b', "c"]` literal into its unquoted items.
fn parse_list_literal(cell: &str) -> Option<Vec<&str>> {
    let inner = cell.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }

    Some(
        inner
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .collect(),
    )
}

fn unquote(item: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = item
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    item
}

/// Grade plant trait regression with the mean R² clipped at zero.
///
/// The submission columns must be exactly `id` followed by [`TRAITS`], and its
/// `id` values must follow the answers row by row.
///
/// # Returns
///
/// The mean together with the clipped R² of every trait, in [`TRAITS`] order.
pub fn grade_hard(submission: &Table, answers: &Table) -> Result<(f64, Vec<f64>), GradeError> {
    const ID: &str = "id";

    let expected = std::iter::once(ID)
        .chain(TRAITS)
        .map(String::from)
        .collect::<Vec<_>>();
    validate::require_exact_columns(submission, &expected, Side::Submission)?;

    let answer_columns = std::iter::once(ID).chain(TRAITS).collect::<Vec<_>>();
    validate::require_columns(answers, &answer_columns, Side::Answers)?;

    if submission.column(ID)? != answers.column(ID)? {
        return Err(GradeError::InvalidSubmission(
            "`id` values do not match the answers or are in a different order".to_string(),
        ));
    }

    let columns = TRAITS
        .iter()
        .map(|name| {
            Ok((
                validate::f64_column(answers, name, Side::Answers)?,
                validate::f64_column(submission, name, Side::Submission)?,
            ))
        })
        .collect::<Result<Vec<_>, GradeError>>()?;

    let (mean, scores) = mean_clipped_r2(&columns)?;
    for (name, r2) in TRAITS.iter().zip(scores.iter()) {
        log::info!("{name}: R² {r2:.4}");
    }

    Ok((mean, scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(text: &str) -> Table {
        Table::parse(text, ',').expect("valid table")
    }

    #[test]
    fn test_parse_list_literal() {
        assert_eq!(parse_list_literal("['a', \"b\", c]"), Some(vec!["a", "b", "c"]));
        assert_eq!(parse_list_literal(" [1,2] "), Some(vec!["1", "2"]));
        assert_eq!(parse_list_literal("[]"), Some(vec![]));
        assert_eq!(parse_list_literal("a, b"), None);
    }

    #[test]
    fn test_medium() -> Result<(), GradeError> {
        let submission = table(
            "predictions\n\"['i1', 'i2', 'i3']\"\n\"['i4', 'i5']\"\n\"['i7']\"\n",
        );
        let answers = table("next_item\ni1\ni5\ni9\n");
        assert_relative_eq!(grade_medium(&submission, &answers)?, (1.0 + 0.5) / 3.0);
        Ok(())
    }

    #[test]
    fn test_medium_cutoff() -> Result<(), GradeError> {
        let items = (0..150).map(|i| format!("'x{i}'")).collect::<Vec<_>>();
        let submission = Table::new(
            vec!["predictions".to_string()],
            vec![vec![format!("[{}]", items.join(", "))]],
        )?;
        let answers = table("next_item\nx120\n");
        assert_eq!(grade_medium(&submission, &answers)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_hard() -> Result<(), GradeError> {
        let header = "id,X4,X11,X18,X26,X50,X3112";
        let answers = table(&format!("{header}\n1,1,1,1,1,1,1\n2,2,2,2,2,2,2\n3,3,3,3,3,3,3\n"));
        let submission = table(&format!("{header}\n1,1,3,1,1,1,1\n2,2,2,2,2,2,2\n3,3,1,3,3,3,3\n"));
        let (mean, scores) = grade_hard(&submission, &answers)?;
        // X11 is anti-correlated and clipped to zero, the rest are perfect
        assert_eq!(scores[1], 0.0);
        assert_relative_eq!(mean, 5.0 / 6.0);
        Ok(())
    }

    #[test]
    fn test_hard_column_order() {
        let answers = table("id,X4,X11,X18,X26,X50,X3112\n1,1,1,1,1,1,1\n");
        let submission = table("id,X11,X4,X18,X26,X50,X3112\n1,1,1,1,1,1,1\n");
        assert!(matches!(
            grade_hard(&submission, &answers),
            Err(GradeError::InvalidSubmission(_))
        ));
    }
}
