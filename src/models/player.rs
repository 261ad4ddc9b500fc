//! Per-player statistic records.

use std::collections::HashMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Leaderboard position of a player with no leaderboard entry.
pub const UNRANKED_POSITION: u32 = 9999;

/// Parse an upstream stat value. Missing, malformed and non-finite values are 0.
pub fn parse_stat(raw: Option<&String>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse an upstream integer count, truncating any fractional part.
/// Missing, negative or malformed values are 0.
pub fn parse_count(raw: Option<&String>) -> u32 {
    let Some(s) = raw.map(|s| s.trim()) else {
        return 0;
    };
    s.parse::<u32>().unwrap_or_else(|_| {
        let v = parse_stat(Some(&s.to_string()));
        if v > 0.0 {
            v.trunc().min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    })
}

macro_rules! stat_line {
    ($( $(#[$doc:meta])* $field:ident => $key:literal ),+ $(,)?) => {
        /// Summable per-player counters, keyed on the upstream `player_stats` names.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        pub struct StatLine {
            $( $(#[$doc])* pub $field: f64, )+
        }

        impl StatLine {
            /// Upstream key for every field, in declaration order.
            pub const KEYS: &'static [&'static str] = &[$($key),+];

            /// Extract every field from an upstream stat map.
            pub fn from_stat_map(stats: &HashMap<String, String>) -> Self {
                Self {
                    $( $field: parse_stat(stats.get($key)), )+
                }
            }
        }

        impl AddAssign<&StatLine> for StatLine {
            fn add_assign(&mut self, other: &StatLine) {
                $( self.$field += other.$field; )+
            }
        }
    };
}

stat_line! {
    kills => "Kills",
    deaths => "Deaths",
    assists => "Assists",
    mvps => "MVPs",
    /// Total damage dealt
    damage => "Damage",
    /// Headshot kills
    headshots => "Headshots",
    double_kills => "Double Kills",
    triple_kills => "Triple Kills",
    quadro_kills => "Quadro Kills",
    penta_kills => "Penta Kills",
    /// Kills made in 1vX situations
    clutch_kills => "Clutch Kills",
    /// Opening kills
    first_kills => "First Kills",
    entry_count => "Entry Count",
    one_v2_count => "1v2Count",
    one_v2_wins => "1v2Wins",
    one_v1_count => "1v1Count",
    one_v1_wins => "1v1Wins",
    flash_count => "Flash Count",
    flash_successes => "Flash Successes",
    enemies_flashed => "Enemies Flashed",
    utility_damage => "Utility Damage",
    /// Utility pieces thrown
    utility_count => "Utility Count",
    utility_successes => "Utility Successes",
    pistol_kills => "Pistol Kills",
    /// AWP/Scout/G3SG1/SCAR-20 kills
    sniper_kills => "Sniper Kills",
    knife_kills => "Knife Kills",
    zeus_kills => "Zeus Kills",
}

/// One player's statistics for one match.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMatchRecord {
    pub player_id: PlayerId,
    pub nickname: String,
    pub avatar: Option<String>,
    pub team_win: bool,
    /// Rounds played in the match
    pub rounds: u32,
    pub stats: StatLine,
}

/// Cumulative statistics for one player across every loaded match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPlayerStats {
    pub player_id: PlayerId,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Matches the player appeared in
    pub matches: u32,
    /// Matches the player's team won
    pub wins: u32,
    pub rounds: u32,

    #[serde(flatten)]
    pub stats: StatLine,

    /// wins / matches, as a percentage
    pub win_rate: f64,
    pub kd_ratio: f64,
    /// Kills per round
    pub kr_ratio: f64,
    /// Average damage per round
    pub adr: f64,
    /// headshots / kills, as a percentage
    pub hs_percent: f64,
    pub utility_usage_per_round: f64,

    /// Leaderboard points (0 until merged)
    pub points: f64,
    pub leaderboard_position: u32,
    pub leaderboard_wins: u32,
    pub leaderboard_played: u32,
}

impl AggregatedPlayerStats {
    /// Start an aggregate from a player's first observed match.
    pub fn from_first_match(record: PlayerMatchRecord) -> Self {
        Self {
            player_id: record.player_id,
            nickname: record.nickname,
            avatar: record.avatar.filter(|a| !a.is_empty()),
            matches: 1,
            wins: u32::from(record.team_win),
            rounds: record.rounds,
            stats: record.stats,
            win_rate: 0.0,
            kd_ratio: 0.0,
            kr_ratio: 0.0,
            adr: 0.0,
            hs_percent: 0.0,
            utility_usage_per_round: 0.0,
            points: 0.0,
            leaderboard_position: UNRANKED_POSITION,
            leaderboard_wins: 0,
            leaderboard_played: 0,
        }
    }

    /// Fold another match into the running totals.
    ///
    /// Identity fields are only filled while still empty.
    pub fn absorb(&mut self, record: &PlayerMatchRecord) {
        self.matches += 1;
        if record.team_win {
            self.wins += 1;
        }
        self.rounds += record.rounds;
        self.stats += &record.stats;

        if self.nickname.is_empty() && !record.nickname.is_empty() {
            self.nickname = record.nickname.clone();
        }
        if self.avatar.is_none() {
            if let Some(avatar) = record.avatar.as_ref().filter(|a| !a.is_empty()) {
                self.avatar = Some(avatar.clone());
            }
        }
    }

    /// Whether a leaderboard entry has been merged into this record.
    pub fn is_on_leaderboard(&self) -> bool {
        self.leaderboard_position != UNRANKED_POSITION
    }
}
