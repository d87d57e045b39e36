#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

use std::path::Path;

use benchgrade_io::Table;

/// Pose tables and camera centers.
pub mod center;

/// Error types for pose evaluation.
pub mod error;

/// Linear algebra utilities.
pub mod linalg;

/// Mean average accuracy over aligned camera centers.
pub mod maa;

/// Similarity transform estimation.
pub mod similarity;

pub use center::{centers_from_table, CenterMap, DuplicatePolicy, PoseRecord};
pub use error::PoseError;
pub use maa::{evaluate_maa, MaaResult, PoseEvalParams, TripletSearch, DEFAULT_THRESHOLD};
pub use similarity::{umeyama_similarity, SimilarityTransform};

/// Load a submission and a ground truth pose table and evaluate their camera centers.
///
/// Both tables are validated before any computation, so a missing column in either
/// input fails without scoring.
///
/// # Arguments
///
/// * `submission` - Path to the predicted pose table.
/// * `ground_truth` - Path to the ground truth pose table.
/// * `params` - Evaluation parameters.
pub fn evaluate_files(
    submission: impl AsRef<Path>,
    ground_truth: impl AsRef<Path>,
    params: &PoseEvalParams,
) -> Result<MaaResult, PoseError> {
    let submission = Table::read_csv(submission)?;
    let ground_truth = Table::read_csv(ground_truth)?;

    center::validate_pose_table(&submission, "submission")?;
    center::validate_pose_table(&ground_truth, "ground truth")?;

    let pred = centers_from_table(&submission, params.duplicates, "submission")?;
    let gt = centers_from_table(&ground_truth, params.duplicates, "ground truth")?;
    log::info!(
        "loaded {} predicted and {} ground truth camera centers",
        pred.len(),
        gt.len()
    );

    evaluate_maa(&pred, &gt, params)
}
