//! Checks shared by the graders.
//!
//! Problems in the submission become [`GradeError::InvalidSubmission`], problems in
//! the answers become [`GradeError::InvalidAnswers`].

use std::collections::HashSet;

use benchgrade_io::{IoError, Table};

use crate::error::GradeError;

/// Which side of the grading an input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Submission,
    Answers,
}

impl Side {
    fn name(&self) -> &'static str {
        match self {
            Side::Submission => "Submission",
            Side::Answers => "Answers",
        }
    }

    pub(crate) fn error(&self, msg: impl Into<String>) -> GradeError {
        match self {
            Side::Submission => GradeError::InvalidSubmission(msg.into()),
            Side::Answers => GradeError::InvalidAnswers(msg.into()),
        }
    }
}

pub(crate) fn require_columns(
    table: &Table,
    columns: &[&str],
    side: Side,
) -> Result<(), GradeError> {
    let missing = table.missing_columns(columns);
    if !missing.is_empty() {
        return Err(side.error(format!(
            "{} is missing required columns: {:?}",
            side.name(),
            missing
        )));
    }
    Ok(())
}

pub(crate) fn require_exact_columns(
    table: &Table,
    columns: &[String],
    side: Side,
) -> Result<(), GradeError> {
    if table.headers() != columns {
        return Err(side.error(format!(
            "{} columns should be {:?}, got {:?}",
            side.name(),
            columns,
            table.headers()
        )));
    }
    Ok(())
}

pub(crate) fn require_non_empty(table: &Table, side: Side) -> Result<(), GradeError> {
    if table.is_empty() {
        return Err(side.error(format!("{} has no rows", side.name())));
    }
    Ok(())
}

pub(crate) fn require_same_length(submission: &Table, answers: &Table) -> Result<(), GradeError> {
    if submission.len() != answers.len() {
        return Err(GradeError::InvalidSubmission(format!(
            "Expected the submission to have {} rows, but got {}",
            answers.len(),
            submission.len()
        )));
    }
    Ok(())
}

/// Parse a numeric column, reporting unparseable cells against the given side.
pub(crate) fn f64_column(table: &Table, column: &str, side: Side) -> Result<Vec<f64>, GradeError> {
    table.f64_column(column).map_err(|e| match e {
        IoError::InvalidValue { .. } | IoError::MissingColumn(_) => {
            side.error(format!("{} column `{column}` must be numeric: {e}", side.name()))
        }
        other => other.into(),
    })
}

pub(crate) fn bool_column(table: &Table, column: &str, side: Side) -> Result<Vec<bool>, GradeError> {
    table.bool_column(column).map_err(|e| match e {
        IoError::InvalidValue { .. } | IoError::MissingColumn(_) => {
            side.error(format!("{} column `{column}` must be binary: {e}", side.name()))
        }
        other => other.into(),
    })
}

pub(crate) fn require_probabilities(values: &[f64], column: &str) -> Result<(), GradeError> {
    if values.iter().any(|v| !(0.0..=1.0).contains(v)) {
        return Err(GradeError::InvalidSubmission(format!(
            "Submission `{column}` column should contain probabilities between 0 and 1 inclusive"
        )));
    }
    Ok(())
}

/// Sort both tables by `id` and check that they list the same identifiers.
pub(crate) fn sort_and_match_ids(
    submission: &Table,
    answers: &Table,
    id: &str,
) -> Result<(Table, Table), GradeError> {
    let submission = submission.sorted_by(id)?;
    let answers = answers.sorted_by(id)?;

    if submission.column(id)? != answers.column(id)? {
        return Err(GradeError::InvalidSubmission(format!(
            "Submission and answers should have the same `{id}` values"
        )));
    }

    Ok((submission, answers))
}

/// Check that both tables hold the same set of identifiers, ignoring order.
pub(crate) fn require_same_id_set(
    submission: &Table,
    answers: &Table,
    id: &str,
) -> Result<(), GradeError> {
    let sub_ids = submission.column(id)?.into_iter().collect::<HashSet<_>>();
    let ans_ids = answers.column(id)?.into_iter().collect::<HashSet<_>>();

    if sub_ids != ans_ids {
        let missing = ans_ids.difference(&sub_ids).count();
        let extra = sub_ids.difference(&ans_ids).count();
        return Err(GradeError::InvalidSubmission(format!(
            "Submission and answers have different `{id}` values ({missing} missing, {extra} unexpected)"
        )));
    }
    Ok(())
}
