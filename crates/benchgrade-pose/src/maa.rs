use rand::{rngs::StdRng, SeedableRng};

use crate::{
    center::{CenterMap, DuplicatePolicy},
    error::PoseError,
    linalg,
    similarity::{umeyama_similarity, SimilarityTransform},
};

/// Default distance under which an aligned camera center counts as an inlier.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// How candidate triplets are drawn from the common identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TripletSearch {
    /// Visit every unordered triplet, `C(n, 3)` candidates.
    #[default]
    Exhaustive,
    /// Draw a fixed number of random triplets.
    ///
    /// Falls back to [`TripletSearch::Exhaustive`] when there are no more triplets
    /// than the budget.
    Sampled {
        /// Number of triplets to draw.
        iterations: usize,
        /// Optional fixed seed for reproducible sampling.
        seed: Option<u64>,
    },
}

/// Parameters of the camera center evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEvalParams {
    /// Inlier distance threshold, in the units of the camera centers.
    pub threshold: f64,
    /// Candidate triplet strategy.
    pub search: TripletSearch,
    /// Handling of repeated identifiers when loading pose tables.
    pub duplicates: DuplicatePolicy,
}

impl Default for PoseEvalParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            search: TripletSearch::Exhaustive,
            duplicates: DuplicatePolicy::LastWins,
        }
    }
}

/// Outcome of the camera center evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MaaResult {
    /// Fraction of common identifiers that are inliers under the best transform.
    pub maa: f64,
    /// Number of inliers under the best transform.
    pub num_inliers: usize,
    /// Number of identifiers present in both inputs.
    pub num_common: usize,
    /// Identifiers of the triplet the best transform was estimated from.
    pub triplet: Option<[String; 3]>,
    /// The best transform, absent when no candidate produced an inlier.
    pub transform: Option<SimilarityTransform>,
}

/// Best candidate seen so far during the search.
struct Best {
    inliers: usize,
    triplet: [usize; 3],
    transform: SimilarityTransform,
}

/// Count the predicted centers that land within `threshold` of their ground truth.
pub fn count_inliers(
    transform: &SimilarityTransform,
    pred: &[[f64; 3]],
    gt: &[[f64; 3]],
    threshold: f64,
) -> usize {
    pred.iter()
        .zip(gt.iter())
        .filter(|(p, g)| linalg::distance(&transform.apply(p), g) < threshold)
        .count()
}

/// Evaluate predicted camera centers against the ground truth (mAA).
///
/// For every candidate triplet of identifiers present in both maps, a similarity
/// transform is estimated from the three predicted centers to their ground truth
/// counterparts and applied to all predicted centers. The candidate with the most
/// inliers wins; on ties the first candidate in enumeration order is kept.
/// Triplets are enumerated over the common identifiers in ascending order.
///
/// # Arguments
///
/// * `pred` - Predicted camera centers.
/// * `gt` - Ground truth camera centers.
/// * `params` - Threshold and search strategy.
///
/// # Returns
///
/// `num_inliers / num_common`, or `0.0` when the maps share no identifier.
pub fn evaluate_maa(
    pred: &CenterMap,
    gt: &CenterMap,
    params: &PoseEvalParams,
) -> Result<MaaResult, PoseError> {
    if !(params.threshold > 0.0) || !params.threshold.is_finite() {
        return Err(PoseError::InvalidThreshold(params.threshold));
    }
    if let TripletSearch::Sampled { iterations: 0, .. } = params.search {
        return Err(PoseError::EmptySampleBudget);
    }

    let common_ids = pred
        .keys()
        .filter(|id| gt.contains_key(*id))
        .cloned()
        .collect::<Vec<_>>();
    let pred_points = common_ids.iter().map(|id| pred[id]).collect::<Vec<_>>();
    let gt_points = common_ids.iter().map(|id| gt[id]).collect::<Vec<_>>();

    let n = common_ids.len();
    log::debug!("{} common ids out of {} predicted", n, pred.len());

    let best = match &params.search {
        TripletSearch::Sampled {
            iterations,
            seed,
        } if num_triplets(n) > *iterations as u128 => sampled_search(
            &pred_points,
            &gt_points,
            params.threshold,
            *iterations,
            *seed,
        ),
        _ => exhaustive_search(&pred_points, &gt_points, params.threshold),
    };

    let result = match best {
        Some(best) => MaaResult {
            maa: best.inliers as f64 / n as f64,
            num_inliers: best.inliers,
            num_common: n,
            triplet: Some(best.triplet.map(|i| common_ids[i].clone())),
            transform: Some(best.transform),
        },
        None => MaaResult {
            maa: 0.0,
            num_inliers: 0,
            num_common: n,
            triplet: None,
            transform: None,
        },
    };

    log::info!(
        "mAA {:.4} ({} / {} inliers)",
        result.maa,
        result.num_inliers,
        result.num_common
    );

    Ok(result)
}

/// Number of unordered triplets among `n` items.
fn num_triplets(n: usize) -> u128 {
    let n = n as u128;
    if n < 3 {
        return 0;
    }
    n * (n - 1) * (n - 2) / 6
}

/// Estimate and score the transform of one triplet, updating `best` on a strict improvement.
fn try_triplet(
    triplet: [usize; 3],
    pred: &[[f64; 3]],
    gt: &[[f64; 3]],
    threshold: f64,
    best: &mut Option<Best>,
) {
    let src = triplet.map(|i| pred[i]);
    let dst = triplet.map(|i| gt[i]);

    let Some(transform) = umeyama_similarity(&src, &dst) else {
        log::debug!("skipping degenerate triplet {:?}", triplet);
        return;
    };

    let inliers = count_inliers(&transform, pred, gt, threshold);
    let best_inliers = best.as_ref().map_or(0, |b| b.inliers);
    if inliers > best_inliers {
        *best = Some(Best {
            inliers,
            triplet,
            transform,
        });
    }
}

fn exhaustive_search(pred: &[[f64; 3]], gt: &[[f64; 3]], threshold: f64) -> Option<Best> {
    let n = pred.len();
    let mut best = None;
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                try_triplet([i, j, k], pred, gt, threshold, &mut best);

                // every point is already an inlier, later triplets can only tie
                if best.as_ref().is_some_and(|b: &Best| b.inliers == n) {
                    return best;
                }
            }
        }
    }
    best
}

fn sampled_search(
    pred: &[[f64; 3]],
    gt: &[[f64; 3]],
    threshold: f64,
    iterations: usize,
    seed: Option<u64>,
) -> Option<Best> {
    let n = pred.len();
    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut best = None;
    for _ in 0..iterations {
        let sample = rand::seq::index::sample(&mut rng, n, 3);
        let mut triplet = [sample.index(0), sample.index(1), sample.index(2)];
        triplet.sort_unstable();
        try_triplet(triplet, pred, gt, threshold, &mut best);

        if best.as_ref().is_some_and(|b: &Best| b.inliers == n) {
            break;
        }
    }
    best
}
