use std::{collections::BTreeMap, path::Path};

use benchgrade_io::{read_json, read_jsonl, read_lines, IoError, Table};
use benchgrade_pose::PoseEvalParams;
use serde::{de::DeserializeOwned, Serialize};

use crate::{audio, error::GradeError, graph, image, multimodal, tabular, task::Task, text};

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    /// The graded task.
    pub task: Task,
    /// Name of the metric.
    pub metric: &'static str,
    /// Value of the metric.
    pub score: f64,
    /// Whether a larger score ranks higher on the leaderboard.
    pub higher_is_better: bool,
    /// Additional named quantities reported by the grader.
    pub details: BTreeMap<String, f64>,
}

impl GradeReport {
    fn new(task: Task, score: f64) -> Self {
        Self {
            task,
            metric: task.metric(),
            score,
            higher_is_better: task.higher_is_better(),
            details: BTreeMap::new(),
        }
    }

    fn with_detail(mut self, name: impl Into<String>, value: f64) -> Self {
        self.details.insert(name.into(), value);
        self
    }
}

impl std::fmt::Display for GradeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.6}", self.metric, self.score)
    }
}

/// Load a submission and its answers from disk and grade them.
///
/// CSV tasks read both files as tables. The graph tasks read JSON documents, except
/// for the retrieval task whose submission is plain text and answers are JSON lines.
///
/// # Arguments
///
/// * `task` - The task to grade.
/// * `submission` - Path to the participant's file.
/// * `answers` - Path to the private answers.
pub fn grade(
    task: Task,
    submission: impl AsRef<Path>,
    answers: impl AsRef<Path>,
) -> Result<GradeReport, GradeError> {
    let submission = submission.as_ref();
    let answers = answers.as_ref();
    log::info!(
        "grading {task}: {} against {}",
        submission.display(),
        answers.display()
    );

    let report = match task {
        Task::GraphEasy => {
            let score = graph::grade_easy(&read_submission_json(submission)?, &read_json(answers)?)?;
            GradeReport::new(task, score)
        }
        Task::GraphMedium => {
            let score =
                graph::grade_medium(&read_submission_json(submission)?, &read_json(answers)?)?;
            GradeReport::new(task, score)
        }
        Task::GraphHard => {
            let lines = read_lines(submission)?;
            let questions = read_jsonl::<graph::QuestionPapers>(answers)?;
            let score = graph::grade_hard(&lines, &questions)?;
            GradeReport::new(task, score).with_detail("questions", questions.len() as f64)
        }
        _ => {
            let submission = Table::read_csv(submission)?;
            let answers = Table::read_csv(answers)?;
            grade_tables(task, &submission, &answers)?
        }
    };

    log::info!("{task}: {report}");
    Ok(report)
}

/// Grade a CSV task from tables already in memory.
///
/// # Errors
///
/// Returns [`GradeError::UnknownTask`] for the graph tasks, which are not tabular.
pub fn grade_tables(
    task: Task,
    submission: &Table,
    answers: &Table,
) -> Result<GradeReport, GradeError> {
    let score = match task {
        Task::AudioEasy => audio::grade_easy(submission, answers)?,
        Task::AudioMedium => audio::grade_medium(submission, answers)?,
        Task::AudioHard => audio::grade_hard(submission, answers)?,
        Task::ImageEasy => image::grade_easy(submission, answers)?,
        Task::ImageMedium => image::grade_medium(submission, answers)?,
        Task::ImageHard => {
            let result = image::grade_hard(submission, answers, &PoseEvalParams::default())?;
            let mut report = GradeReport::new(task, result.maa)
                .with_detail("num_inliers", result.num_inliers as f64)
                .with_detail("num_common", result.num_common as f64);
            if let Some(transform) = result.transform {
                report = report.with_detail("scale", transform.scale);
            }
            return Ok(report);
        }
        Task::TextMedium => text::grade_medium(submission, answers)?,
        Task::TextHard => text::grade_hard(submission, answers)?,
        Task::TabularEasy => tabular::grade_easy(submission, answers)?,
        Task::TabularMedium => tabular::grade_medium(submission, answers)?,
        Task::TabularHard => tabular::grade_hard(submission, answers)?,
        Task::MultiModalMedium => multimodal::grade_medium(submission, answers)?,
        Task::MultiModalHard => {
            let (mean, scores) = multimodal::grade_hard(submission, answers)?;
            let report = multimodal::TRAITS
                .iter()
                .zip(scores)
                .fold(GradeReport::new(task, mean), |report, (name, r2)| {
                    report.with_detail(format!("r2_{name}"), r2)
                });
            return Ok(report);
        }
        Task::GraphEasy | Task::GraphMedium | Task::GraphHard => {
            return Err(GradeError::UnknownTask(format!("{task} is not a tabular task")));
        }
    };

    Ok(GradeReport::new(task, score).with_detail("rows", submission.len() as f64))
}

/// Read a JSON submission, treating undecodable documents as the participant's fault.
fn read_submission_json<T: DeserializeOwned>(path: &Path) -> Result<T, GradeError> {
    read_json(path).map_err(|e| match e {
        IoError::JsonError(e) => GradeError::InvalidSubmission(format!("JSON load error: {e}")),
        other => other.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = GradeReport::new(Task::ImageEasy, 0.25);
        assert_eq!(report.to_string(), "rmse: 0.250000");
    }

    #[test]
    fn test_report_json() -> Result<(), serde_json::Error> {
        let report = GradeReport::new(Task::ImageHard, 0.5).with_detail("num_common", 4.0);
        let value = serde_json::to_value(&report)?;
        assert_eq!(value["task"], "image/hard");
        assert_eq!(value["metric"], "maa");
        assert_eq!(value["score"], 0.5);
        assert_eq!(value["higher_is_better"], true);
        assert_eq!(value["details"]["num_common"], 4.0);
        Ok(())
    }

    #[test]
    fn test_graph_tasks_are_not_tabular() -> Result<(), GradeError> {
        let table = Table::parse("a\n1\n", ',')?;
        assert!(matches!(
            grade_tables(Task::GraphEasy, &table, &table),
            Err(GradeError::UnknownTask(_))
        ));
        Ok(())
    }
}
