use std::collections::HashSet;

use benchgrade_io::Table;
use benchgrade_metrics::{accuracy, mean_set_f1, roc_auc};

use crate::{
    error::GradeError,
    validate::{self, Side},
};

/// Label of a recording without any bird call.
pub const NO_CALL: &str = "nocall";

/// Grade whale call probabilities with the ROC AUC.
///
/// Both tables have an `Id` and a `Probability` column; the answers hold `0`/`1`.
pub fn grade_easy(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "Id";
    const TARGET: &str = "Probability";

    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;
    validate::require_columns(submission, &[ID, TARGET], Side::Submission)?;
    validate::require_same_length(submission, answers)?;

    let probs = validate::f64_column(submission, TARGET, Side::Submission)?;
    validate::require_probabilities(&probs, TARGET)?;

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, ID)?;
    let y_true = validate::bool_column(&answers, TARGET, Side::Answers)?;
    let y_score = validate::f64_column(&submission, TARGET, Side::Submission)?;

    Ok(roc_auc(&y_true, &y_score)?)
}

/// Grade clip labels with the accuracy, matching rows on `fname`.
pub fn grade_medium(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "fname";
    const TARGET: &str = "label";

    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;
    validate::require_same_length(submission, answers)?;
    validate::require_columns(submission, &[ID, TARGET], Side::Submission)?;

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, ID)?;
    let y_true = answers.column(TARGET)?;
    let y_pred = submission.column(TARGET)?;

    Ok(accuracy(&y_true, &y_pred)?)
}

/// Grade bird species with the mean F1 of the per-row label sets.
///
/// The submission must have the same columns as the answers and list the `row_id`
/// values in the same order. `birds` holds space separated labels, or `nocall`.
pub fn grade_hard(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "row_id";
    const TARGET: &str = "birds";

    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;
    validate::require_exact_columns(submission, answers.headers(), Side::Submission)?;

    if submission.column(ID)? != answers.column(ID)? {
        return Err(GradeError::InvalidSubmission(format!(
            "`{ID}` values do not match the answers or are in a different order"
        )));
    }

    let true_sets = answers
        .column(TARGET)?
        .into_iter()
        .map(label_set)
        .collect::<Vec<_>>();
    let pred_sets = submission
        .column(TARGET)?
        .into_iter()
        .map(label_set)
        .collect::<Vec<_>>();

    Ok(mean_set_f1(&true_sets, &pred_sets)?)
}

fn label_set(cell: &str) -> HashSet<&str> {
    if cell.trim() == NO_CALL {
        return HashSet::new();
    }
    cell.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(text: &str) -> Table {
        Table::parse(text, ',').expect("valid table")
    }

    #[test]
    fn test_easy() -> Result<(), GradeError> {
        let answers = table("Id,Probability\n1,0\n2,0\n3,1\n4,1\n");
        let submission = table("Id,Probability\n4,0.8\n3,0.35\n2,0.4\n1,0.1\n");
        assert_relative_eq!(grade_easy(&submission, &answers)?, 0.75);
        Ok(())
    }

    #[test]
    fn test_easy_rejects_out_of_range() {
        let answers = table("Id,Probability\n1,0\n2,1\n");
        let submission = table("Id,Probability\n1,1.5\n2,0.2\n");
        assert!(matches!(
            grade_easy(&submission, &answers),
            Err(GradeError::InvalidSubmission(_))
        ));
    }

    #[test]
    fn test_medium() -> Result<(), GradeError> {
        let answers = table("fname,label\na.wav,Bark\nb.wav,Meow\nc.wav,Bark\nd.wav,Cough\n");
        let submission = table("fname,label\nd.wav,Cough\nc.wav,Meow\nb.wav,Meow\na.wav,Bark\n");
        assert_relative_eq!(grade_medium(&submission, &answers)?, 0.75);

        let short = table("fname,label\na.wav,Bark\n");
        assert!(matches!(
            grade_medium(&short, &answers),
            Err(GradeError::InvalidSubmission(_))
        ));
        Ok(())
    }

    #[test]
    fn test_hard() -> Result<(), GradeError> {
        let answers = table("row_id,birds\nr1,nocall\nr2,amecro bkcchi\nr3,amecro\n");
        let submission = table("row_id,birds\nr1,nocall\nr2,amecro\nr3,nocall\n");
        // 1.0, f1(p = 1, r = 0.5) = 2/3, 0.0
        assert_relative_eq!(
            grade_hard(&submission, &answers)?,
            (1.0 + 2.0 / 3.0) / 3.0,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn test_hard_requires_same_order() {
        let answers = table("row_id,birds\nr1,nocall\nr2,amecro\n");
        let submission = table("row_id,birds\nr2,amecro\nr1,nocall\n");
        assert!(matches!(
            grade_hard(&submission, &answers),
            Err(GradeError::InvalidSubmission(_))
        ));

        let renamed = table("row,birds\nr1,nocall\nr2,amecro\n");
        assert!(matches!(
            grade_hard(&renamed, &answers),
            Err(GradeError::InvalidSubmission(_))
        ));
    }
}
