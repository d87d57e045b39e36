#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the metrics module.
pub mod error;

/// Classification metrics: accuracy, MCC, ROC AUC and log-loss.
pub mod classification;

/// Leaderboard ranking.
pub mod leaderboard;

/// Ranking metrics: average precision and reciprocal rank.
pub mod ranking;

/// Regression metrics: RMSE and R².
pub mod regression;

/// Metrics over label sets.
pub mod sets;

pub use classification::*;
pub use error::MetricsError;
pub use leaderboard::{rank_percentage, LeaderboardRank};
pub use ranking::*;
pub use regression::*;
pub use sets::*;
