use crate::error::MetricsError;

/// Position of a score on a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderboardRank {
    /// One-based rank.
    pub rank: usize,
    /// Number of entries on the leaderboard.
    pub total: usize,
    /// `rank / total * 100`, smaller is better.
    pub percentage: f64,
}

/// Locate `score` on a sorted leaderboard.
///
/// The sort direction is inferred from the board itself: when the first entry is
/// greater than or equal to the last one (or there is a single entry) higher scores
/// are better. The rank is the insertion point of the score in front of equal
/// entries, clamped to the leaderboard size.
pub fn rank_percentage(score: f64, leaderboard: &[f64]) -> Result<LeaderboardRank, MetricsError> {
    let (first, last) = match (leaderboard.first(), leaderboard.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(MetricsError::EmptyInput("leaderboard")),
    };

    let is_descending = leaderboard.len() == 1 || first >= last;
    let position = if is_descending {
        leaderboard.partition_point(|&s| s > score)
    } else {
        leaderboard.partition_point(|&s| s < score)
    };

    let total = leaderboard.len();
    let rank = (position + 1).min(total);

    Ok(LeaderboardRank {
        rank,
        total,
        percentage: rank as f64 / total as f64 * 100.0,
    })
}
