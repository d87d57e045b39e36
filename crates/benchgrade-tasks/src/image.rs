use benchgrade_io::Table;
use benchgrade_metrics::{binary_log_loss, rmse};
use benchgrade_pose::{center, centers_from_table, evaluate_maa, MaaResult, PoseEvalParams};

use crate::{
    error::GradeError,
    validate::{self, Side},
};

/// Grade a scalar regression with the RMSE, matching rows on `id`.
pub fn grade_easy(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "id";
    const TARGET: &str = "value";

    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;
    validate::f64_column(answers, TARGET, Side::Answers)?;

    validate::require_columns(submission, &[ID, TARGET], Side::Submission)?;
    validate::f64_column(submission, TARGET, Side::Submission)?;
    validate::require_same_length(submission, answers)?;

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, ID)?;
    let y_true = validate::f64_column(&answers, TARGET, Side::Answers)?;
    let y_pred = validate::f64_column(&submission, TARGET, Side::Submission)?;

    Ok(rmse(&y_true, &y_pred)?)
}

/// Grade iceberg probabilities with the binary log-loss.
///
/// The submission must cover the same set of `id` values as the answers, in any
/// order, with every `is_iceberg` value in `[0, 1]`.
pub fn grade_medium(submission: &Table, answers: &Table) -> Result<f64, GradeError> {
    const ID: &str = "id";
    const TARGET: &str = "is_iceberg";

    validate::require_columns(answers, &[ID, TARGET], Side::Answers)?;
    validate::require_columns(submission, &[ID, TARGET], Side::Submission)?;
    validate::require_same_id_set(submission, answers, ID)?;

    let probs = validate::f64_column(submission, TARGET, Side::Submission)?;
    validate::require_probabilities(&probs, TARGET)?;

    let (submission, answers) = validate::sort_and_match_ids(submission, answers, ID)?;
    let y_true = validate::bool_column(&answers, TARGET, Side::Answers)?;
    let y_prob = validate::f64_column(&submission, TARGET, Side::Submission)?;

    Ok(binary_log_loss(&y_true, &y_prob)?)
}

/// Grade camera poses with the mean average accuracy of the aligned centers.
///
/// Both tables are checked for the pose columns before anything is computed.
pub fn grade_hard(
    submission: &Table,
    answers: &Table,
    params: &PoseEvalParams,
) -> Result<MaaResult, GradeError> {
    center::validate_pose_table(submission, "submission")?;
    center::validate_pose_table(answers, "ground truth")?;

    let pred = centers_from_table(submission, params.duplicates, "submission")?;
    let gt = centers_from_table(answers, params.duplicates, "ground truth")?;

    Ok(evaluate_maa(&pred, &gt, params)?)
}
