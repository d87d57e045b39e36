use std::collections::HashMap;

use benchgrade_io::Table;
use benchgrade_metrics::{log_loss, reciprocal_rank};

use crate::{
    error::GradeError,
    validate::{self, Side},
};

/// Outcome columns of the chat preference task, in the order they are scored.
pub const PREFERENCE_CLASSES: [&str; 3] = ["winner_model_a", "winner_model_b", "winner_tie"];

/// Grade chat preference probabilities with the multiclass log-loss.
///
/// Every submission row holds one probability per class in [`PREFERENCE_CLASSES`],
/// each in `[0, 1]`, summing to one when rounded to six decimals.
pub fn grade_medium(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "id";
    let required = [ID, PREFERENCE_CLASSES[0], PREFERENCE_CLASSES[1], PREFERENCE_CLASSES[2]];

    validate::require_columns(submission, &required, Side::Submission)?;
    validate::require_columns(answers, &required, Side::Answers)?;
    validate::require_same_length(submission, answers)?;

    let probs = class_rows(submission, Side::Submission)?;
    for row in &probs {
        if row.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(GradeError::InvalidSubmission(
                "All class probabilities must be between 0 and 1".to_string(),
            ));
        }
        let sum = row.iter().sum::<f64>();
        if (sum * 1e6).round() != 1e6 {
            return Err(GradeError::InvalidSubmission(format!(
                "Each row must sum to 1, got {sum}"
            )));
        }
    }

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, ID)?;
    let y_true = class_rows(&answers, Side::Answers)?;
    let y_pred = class_rows(&submission, Side::Submission)?;

    Ok(log_loss(&y_true, &y_pred)?)
}

/// One row of class values per record.
fn class_rows(table: &Table, side: Side) -> Result<Vec<Vec<f64>>, GradeError> {
    let columns = PREFERENCE_CLASSES
        .iter()
        .map(|name| validate::f64_column(table, name, side))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((0..table.len())
        .map(|row| columns.iter().map(|col| col[row]).collect())
        .collect())
}

/// Grade misconception rankings with MAP@25.
///
/// Each submission row ranks space separated misconception ids for one
/// `QuestionId_Answer`. With a single relevant label per row the average precision
/// reduces to the reciprocal rank of that label. Rows whose key is not in the
/// answers are skipped; when no row remains the score is `0.0`.
pub fn grade_hard(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "QuestionId_Answer";
    const TARGET: &str = "MisconceptionId";

    validate::require_columns(submission, &[ID, TARGET], Side::Submission)?;
    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;

    let labels = answers
        .column(ID)?
        .into_iter()
        .zip(answers.column(TARGET)?)
        .map(|(id, label)| (id, label.trim()))
        .collect::<HashMap<_, _>>();

    let mut precisions = Vec::new();
    for (id, ranking) in submission
        .column(ID)?
        .into_iter()
        .zip(submission.column(TARGET)?)
    {
        let Some(label) = labels.get(id) else {
            log::debug!("skipping {id}, not in the answers");
            continue;
        };
        let predictions = ranking.split_whitespace().collect::<Vec<_>>();
        precisions.push(reciprocal_rank(&predictions, label, None));
    }

    if precisions.is_empty() {
        log::warn!("no submission row matches the answers");
        return Ok(0.0);
    }

    Ok(precisions.iter().sum::<f64>() / precisions.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(text: &str) -> Table {
        Table::parse(text, ',').expect("valid table")
    }

    const HEADER: &str = "id,winner_model_a,winner_model_b,winner_tie";

    #[test]
    fn test_medium() -> Result<(), GradeError> {
        let answers = table(&format!("{HEADER}\n1,1,0,0\n2,0,0,1\n"));
        let submission = table(&format!("{HEADER}\n2,0.25,0.25,0.5\n1,0.5,0.25,0.25\n"));
        assert_relative_eq!(
            grade_medium(&submission, &answers)?,
            -(0.5f64.ln() + 0.5f64.ln()) / 2.0,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn test_medium_rows_must_sum_to_one() {
        let answers = table(&format!("{HEADER}\n1,1,0,0\n"));
        let submission = table(&format!("{HEADER}\n1,0.5,0.5,0.5\n"));
        assert!(matches!(
            grade_medium(&submission, &answers),
            Err(GradeError::InvalidSubmission(msg)) if msg.contains("sum to 1")
        ));

        // rounding to six decimals absorbs float noise
        let submission = table(&format!("{HEADER}\n1,0.3333333,0.3333333,0.3333334\n"));
        assert!(grade_medium(&submission, &answers).is_ok());
    }

    #[test]
    fn test_hard() -> Result<(), GradeError> {
        let answers = table("QuestionId_Answer,MisconceptionId\n1_A,10\n1_B,20\n2_C,30\n");
        let submission = table(
            "QuestionId_Answer,MisconceptionId\n1_A,10 11 12\n1_B,5 20 7\n2_C,1 2 3\n9_Z,30\n",
        );
        // 1, 1/2, 0 and the unknown row is ignored
        assert_relative_eq!(grade_hard(&submission, &answers)?, 0.5);
        Ok(())
    }

    #[test]
    fn test_hard_without_overlap() -> Result<(), GradeError> {
        let answers = table("QuestionId_Answer,MisconceptionId\n1_A,10\n");
        let submission = table("QuestionId_Answer,MisconceptionId\n3_A,10\n");
        assert_eq!(grade_hard(&submission, &answers)?, 0.0);
        Ok(())
    }
}
