//! # Hub Stats
//!
//! Aggregated player statistics for a FACEIT hub.
//!
//! ## Architecture
//!
//! - **models**: Upstream payloads, per-player rows, rank tiers and snapshots
//! - **fetch**: FACEIT Data API client behind the `HubDataSource` trait
//! - **calculate**: Normalization, aggregation, leaderboard merge and ranking
//! - **sync**: Load pipeline and the published snapshot
//! - **api**: REST API endpoints and the upstream proxy
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod sync;

pub use models::*;

use std::time::Duration;

const UNIT_SECONDS: &[(char, u64)] = &[('h', 3600), ('m', 60), ('s', 1)];

/// Parse a reload interval such as "1h", "10m" or "90s". A bare number is
/// taken as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, per_unit) = UNIT_SECONDS
        .iter()
        .find_map(|&(unit, secs)| s.strip_suffix(unit).map(|n| (n.trim(), secs)))
        .unwrap_or((s, 1));

    if digits.is_empty() {
        return None;
    }
    let count: u64 = digits.parse().ok()?;
    count.checked_mul(per_unit).map(Duration::from_secs)
}
