//! Statistics calculation engine.
//!
//! Turns raw match data into the ranked player table:
//! - Per-match normalization of upstream stat maps
//! - Cross-match aggregation and derived metrics
//! - Leaderboard merge
//! - Ordering and per-column top-three tiers

pub mod aggregate;
pub mod leaderboard;
pub mod normalize;
pub mod ranking;
pub mod summary;

pub use aggregate::{aggregate_matches, derive_metrics, PlayerTable};
pub use leaderboard::{merge_leaderboard, StandingRow, Standings};
pub use normalize::normalize_match;
pub use ranking::{compute_column_ranks, rank_players, sort_players};
pub use summary::{summarize_match, MatchSummary};

/// Calculate a percentage, 0 when the denominator is 0.
pub fn calculate_percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// Calculate a per-unit rate, 0 when the denominator is 0.
pub fn calculate_rate(value: f64, per: f64) -> f64 {
    if per == 0.0 {
        0.0
    } else {
        value / per
    }
}

/// Kill/death ratio. With no deaths the ratio is the kill count itself.
pub fn calculate_kd_ratio(kills: f64, deaths: f64) -> f64 {
    if deaths > 0.0 {
        kills / deaths
    } else {
        kills
    }
}
