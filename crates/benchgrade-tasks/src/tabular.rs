use std::collections::HashSet;

use benchgrade_io::Table;
use benchgrade_metrics::{matthews_corrcoef, mean_columnwise_rmse, rmse};

use crate::{
    error::GradeError,
    validate::{self, Side},
};

/// Targets scored by the degradation task.
pub const DEGRADATION_SCORED: [&str; 3] = ["reactivity", "deg_Mg_pH10", "deg_Mg_50C"];

/// Targets a degradation submission must contain without being scored.
pub const DEGRADATION_UNSCORED: [&str; 2] = ["deg_pH10", "deg_50C"];

/// Grade taxi fares with the RMSE.
///
/// Keys must be unique on both sides and the two key sets must be equal.
pub fn grade_easy(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "key";
    const TARGET: &str = "fare_amount";

    validate::require_non_empty(submission, Side::Submission)?;
    validate::require_non_empty(answers, Side::Answers)?;
    validate::require_columns(submission, &[ID, TARGET], Side::Submission)?;
    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;

    require_unique(submission, ID, Side::Submission)?;
    require_unique(answers, ID, Side::Answers)?;
    validate::require_same_id_set(submission, answers, ID)?;

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, ID)?;
    let y_true = validate::f64_column(&answers, TARGET, Side::Answers)?;
    let y_pred = validate::f64_column(&submission, TARGET, Side::Submission)?;

    Ok(rmse(&y_true, &y_pred)?)
}

fn require_unique(table: &Table, column: &str, side: Side) -> Result<(), GradeError> {
    let mut seen = HashSet::new();
    for value in table.column(column)? {
        if !seen.insert(value) {
            return Err(side.error(format!("duplicate `{column}` value {value}")));
        }
    }
    Ok(())
}

/// Grade class labels with the Matthews correlation coefficient.
///
/// The submission must have the same columns as the answers; the first column is
/// the identifier and the second one the class.
pub fn grade_medium(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    let (id, class) = match answers.headers() {
        [id, class, ..] => (id.as_str(), class.as_str()),
        _ => {
            return Err(GradeError::InvalidAnswers(
                "Answers need an id and a class column".to_string(),
            ))
        }
    };

    validate::require_exact_columns(submission, answers.headers(), Side::Submission)?;
    validate::require_same_id_set(submission, answers, id)?;

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, id)?;
    let y_true = answers.column(class)?;
    let y_pred = submission.column(class)?;

    Ok(matthews_corrcoef(&y_true, &y_pred)?)
}

/// Grade degradation rates with the mean column-wise RMSE over the kept rows.
///
/// The answers flag the rows to score in a boolean `keep` column. Only
/// [`DEGRADATION_SCORED`] enter the score, [`DEGRADATION_UNSCORED`] are required
/// in the submission anyway.
pub fn grade_hard(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "id_seqpos";
    const KEEP: &str = "keep";

    validate::require_same_length(submission, answers)?;

    let answer_columns = std::iter::once(ID)
        .chain(DEGRADATION_SCORED)
        .chain(std::iter::once(KEEP))
        .collect::<Vec<_>>();
    validate::require_columns(answers, &answer_columns, Side::Answers)?;

    let submission_columns = std::iter::once(ID)
        .chain(DEGRADATION_SCORED)
        .chain(DEGRADATION_UNSCORED)
        .collect::<Vec<_>>();
    validate::require_columns(submission, &submission_columns, Side::Submission)?;

    let submission = submission.sorted_by(ID)?;
    let answers = answers.sorted_by(ID)?;
    for (row, (actual, expected)) in submission
        .column(ID)?
        .into_iter()
        .zip(answers.column(ID)?)
        .enumerate()
    {
        if actual != expected {
            return Err(GradeError::InvalidSubmission(format!(
                "Expected `{ID}` {expected} but got {actual} on row {row} of the sorted submission"
            )));
        }
    }

    let keep = validate::bool_column(&answers, KEEP, Side::Answers)?;
    let columns = DEGRADATION_SCORED
        .iter()
        .map(|name| {
            let y_true = validate::f64_column(&answers, name, Side::Answers)?;
            let y_pred = validate::f64_column(&submission, name, Side::Submission)?;
            Ok((masked(&y_true, &keep), masked(&y_pred, &keep)))
        })
        .collect::<Result<Vec<_>, GradeError>>()?;

    Ok(mean_columnwise_rmse(&columns)?)
}

fn masked(values: &[f64], keep: &[bool]) -> Vec<f64> {
    values
        .iter()
        .zip(keep.iter())
        .filter(|&(_, &k)| k)
        .map(|(&v, _)| v)
        .collect()
}
