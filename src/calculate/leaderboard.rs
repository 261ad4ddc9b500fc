//! Leaderboard merge.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::models::{
    AggregatedPlayerStats, LeaderboardEntry, LeaderboardId, LeaderboardResponse, PlayerId,
};

use super::calculate_percentage;

/// Copy leaderboard standings onto aggregated players by player id.
///
/// Entries for players absent from the aggregate are ignored, and identity
/// fields are never touched. Returns how many players were matched.
pub fn merge_leaderboard(players: &mut [AggregatedPlayerStats], entries: &[LeaderboardEntry]) -> usize {
    let by_id: HashMap<&PlayerId, &LeaderboardEntry> =
        entries.iter().map(|e| (&e.player.user_id, e)).collect();

    let mut matched = 0;
    for player in players.iter_mut() {
        let Some(entry) = by_id.get(&player.player_id) else {
            continue;
        };

        player.points = entry.points;
        player.leaderboard_position = entry.position;
        player.leaderboard_wins = entry.won;
        player.leaderboard_played = entry.played;
        matched += 1;
    }

    debug!(
        "Merged {} of {} leaderboard entries into {} players",
        matched,
        entries.len(),
        players.len()
    );
    matched
}

/// One row of the standings as shown to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub position: u32,
    pub player_id: PlayerId,
    pub nickname: String,
    pub avatar: Option<String>,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub draw: u32,
    pub points: f64,
    /// Percentage in 0..=100
    pub win_rate: f64,
    pub current_streak: i32,
}

impl From<&LeaderboardEntry> for StandingRow {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            position: entry.position,
            player_id: entry.player.user_id.clone(),
            nickname: entry.player.nickname.clone(),
            avatar: entry.player.avatar.clone(),
            played: entry.played,
            won: entry.won,
            lost: entry.lost,
            draw: entry.draw,
            points: entry.points,
            win_rate: calculate_percentage(entry.win_rate, 1.0),
            current_streak: entry.current_streak,
        }
    }
}

/// Leaderboard standings, ordered by position.
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    pub leaderboard_id: LeaderboardId,
    pub name: Option<String>,
    pub entries: Vec<StandingRow>,
}

impl Standings {
    pub fn new(leaderboard_id: LeaderboardId, response: &LeaderboardResponse) -> Self {
        let mut entries: Vec<StandingRow> = response.items.iter().map(StandingRow::from).collect();
        entries.sort_by_key(|row| row.position);
        Self {
            leaderboard_id,
            name: response
                .leaderboard
                .as_ref()
                .map(|meta| meta.leaderboard_name.clone())
                .filter(|name| !name.is_empty()),
            entries,
        }
    }
}
