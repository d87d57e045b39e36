use std::collections::{BTreeMap, HashMap, HashSet};

use benchgrade_metrics::{
    average_precision, roc_auc, weighted_mean_average_precision, MetricsError,
};
use serde::Deserialize;

use crate::error::GradeError;

/// Number of papers every answer line of the question task must list.
pub const TOP_K: usize = 20;

/// Ground truth of one author profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorPapers {
    /// Papers that belong to the author.
    pub normal_data: Vec<String>,
    /// Papers wrongly assigned to the author.
    pub outliers: Vec<String>,
}

/// Per author, the score of every paper of the profile.
pub type AuthorScores = BTreeMap<String, HashMap<String, serde_json::Value>>;

/// Ground truth of the outlier detection task, keyed by author.
pub type AuthorLabels = BTreeMap<String, AuthorPapers>;

/// Grade outlier detection in author profiles.
///
/// For every author a ROC AUC is computed with the genuine papers as the positive
/// class; the per-author scores are averaged with the number of outliers as weight.
/// Scores may be JSON numbers or numeric strings.
pub fn grade_easy(submission: &AuthorScores, answers: &AuthorLabels) -> Result<f64, GradeError> {
    let mut total_auc = 0.0;
    let mut total_weight = 0.0;

    for (author, papers) in answers {
        let scores = submission.get(author).ok_or_else(|| {
            GradeError::InvalidSubmission(format!("Author ID not in submission file: {author}"))
        })?;

        let mut y_true = Vec::with_capacity(papers.normal_data.len() + papers.outliers.len());
        let mut y_score = Vec::with_capacity(y_true.capacity());
        let labelled = papers
            .normal_data
            .iter()
            .map(|p| (p, true))
            .chain(papers.outliers.iter().map(|p| (p, false)));
        for (paper, label) in labelled {
            let value = scores.get(paper).ok_or_else(|| {
                GradeError::InvalidSubmission(format!(
                    "Paper ID not in author profile in submission file: author {author}, paper {paper}"
                ))
            })?;
            y_true.push(label);
            y_score.push(as_score(value).ok_or_else(|| {
                GradeError::InvalidSubmission(format!(
                    "Value error (not a number): author {author}, paper {paper}"
                ))
            })?);
        }

        let auc = roc_auc(&y_true, &y_score)?;
        let weight = papers.outliers.len() as f64;
        log::debug!("author {author}: auc {auc:.4}, weight {weight}");
        total_auc += weight * auc;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return Err(MetricsError::ZeroWeight.into());
    }

    Ok(total_auc / total_weight)
}

fn as_score(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Grade reference tracing with the mean average precision.
///
/// Every paper of the submission scores each of its references with a confidence
/// in `[0, 1]`; the answers hold the matching `0`/`1` labels.
pub fn grade_medium(
    submission: &BTreeMap<String, Vec<f64>>,
    answers: &HashMap<String, Vec<f64>>,
) -> Result<f64, GradeError> {
    if submission.is_empty() {
        return Err(GradeError::InvalidSubmission(
            "The submission does not score any paper".to_string(),
        ));
    }

    let mut total = 0.0;
    for (paper, scores) in submission {
        if scores.iter().any(|s| !(0.0..=1.0).contains(s)) {
            return Err(GradeError::InvalidSubmission(
                "The confidence score does not belong to [0,1]".to_string(),
            ));
        }

        let labels = answers.get(paper).ok_or_else(|| {
            GradeError::InvalidSubmission(format!(
                "paper ID {paper} is not in the evaluated paper set"
            ))
        })?;
        if labels.len() != scores.len() {
            return Err(GradeError::InvalidSubmission(format!(
                "the number of references of paper ID {paper} mismatches with ground truths"
            )));
        }

        let y_true = labels.iter().map(|&l| l != 0.0).collect::<Vec<_>>();
        total += average_precision(&y_true, scores)?;
    }

    Ok(total / submission.len() as f64)
}

/// Ground truth of one question of the paper retrieval task.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionPapers {
    /// Identifiers of the relevant papers.
    pub pids: Vec<String>,
    /// Weight of the question in the mean, `1` when absent.
    #[serde(default = "default_flag")]
    pub flag: f64,
}

fn default_flag() -> f64 {
    1.0
}

/// Grade paper retrieval with the flag weighted MAP.
///
/// The submission has one line per question, in the order of the answers, with
/// exactly [`TOP_K`] comma separated paper identifiers.
pub fn grade_hard(submission: &[String], answers: &[QuestionPapers]) -> Result<f64, GradeError> {
    let n_test = answers.len();
    if submission.len() != n_test {
        let cmp = if submission.len() < n_test { '<' } else { '>' };
        return Err(GradeError::InvalidSubmission(format!(
            "[file] file {cmp}{n_test} lines"
        )));
    }

    let mut queries = Vec::with_capacity(n_test);
    for (line, answer) in submission.iter().zip(answers.iter()) {
        let preds = line.trim().split(',').collect::<Vec<_>>();
        if preds.len() != TOP_K {
            let cmp = if preds.len() < TOP_K { '<' } else { '>' };
            return Err(GradeError::InvalidSubmission(format!(
                "[file] output {cmp}{TOP_K} values"
            )));
        }

        let relevant = answer.pids.iter().map(String::as_str).collect::<HashSet<_>>();
        queries.push(
            preds
                .iter()
                .map(|p| relevant.contains(p))
                .collect::<Vec<_>>(),
        );
    }

    let weights = answers.iter().map(|a| a.flag).collect::<Vec<_>>();
    Ok(weighted_mean_average_precision(&queries, &weights)?)
}
