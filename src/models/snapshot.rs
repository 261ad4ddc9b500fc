//! The published result of one load cycle.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AggregatedPlayerStats, ColumnRank, HubId, RankColumn, RankTier};

/// Non-fatal conditions raised during a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// Leaderboard could not be fetched; leaderboard fields are at defaults.
    LeaderboardUnavailable { message: String },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::LeaderboardUnavailable { message } => {
                write!(f, "leaderboard unavailable: {}", message)
            }
        }
    }
}

/// A player row of the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    /// 1-based table position
    pub position: u32,
    #[serde(flatten)]
    pub stats: AggregatedPlayerStats,
    /// Highlighted cells; columns outside the top three are absent.
    pub tiers: BTreeMap<RankColumn, RankTier>,
}

/// Ranked, annotated player table for a hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSnapshot {
    pub load_id: Uuid,
    pub generation: u64,
    pub hub_id: HubId,
    pub loaded_at: DateTime<Utc>,
    /// Finished matches folded into the table
    pub match_count: u32,
    pub players: Vec<RankedPlayer>,
    pub column_ranks: BTreeMap<RankColumn, ColumnRank>,
    pub warnings: Vec<LoadWarning>,
}

impl HubSnapshot {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player's row by id.
    pub fn player(&self, player_id: &str) -> Option<&RankedPlayer> {
        self.players
            .iter()
            .find(|p| p.stats.player_id.as_str() == player_id)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
