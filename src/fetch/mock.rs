//! In-memory `HubDataSource` for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, HubDataSource};
use crate::models::{
    HubId, HubMatchItem, HubMatchesResponse, LeaderboardEntry, LeaderboardId,
    LeaderboardPlayer, LeaderboardResponse, MatchId, MatchRoster, MatchStatistics,
};

fn unavailable() -> FetchError {
    FetchError::HttpStatus {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

/// Canned hub data with switchable failures.
#[derive(Default)]
pub struct MockSource {
    pub matches: Vec<HubMatchItem>,
    pub rosters: HashMap<MatchId, MatchRoster>,
    pub statistics: HashMap<MatchId, MatchStatistics>,
    pub leaderboard: Option<LeaderboardResponse>,
    pub fail_match_list: bool,
    pub failing_statistics: HashSet<MatchId>,
    pub failing_rosters: HashSet<MatchId>,
    /// Delay applied to every statistics fetch
    pub statistics_delay: Option<Duration>,
    pub statistics_calls: AtomicU32,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match with the given status and its data.
    pub fn with_match(
        mut self,
        match_id: &str,
        status: &str,
        roster: MatchRoster,
        statistics: MatchStatistics,
    ) -> Self {
        let id = MatchId::from(match_id);
        self.matches.push(HubMatchItem {
            match_id: id.clone(),
            status: status.to_string(),
        });
        self.rosters.insert(id.clone(), roster);
        self.statistics.insert(id, statistics);
        self
    }

    /// Set leaderboard standings as (player id, points, position).
    pub fn with_leaderboard(mut self, entries: &[(&str, f64, u32)]) -> Self {
        let items = entries
            .iter()
            .map(|&(id, points, position)| LeaderboardEntry {
                player: LeaderboardPlayer {
                    user_id: id.into(),
                    nickname: id.to_string(),
                    avatar: None,
                    country: None,
                    skill_level: None,
                    faceit_url: None,
                },
                played: 4,
                won: 3,
                lost: 1,
                draw: 0,
                points,
                win_rate: 0.75,
                current_streak: 0,
                position,
            })
            .collect();
        self.leaderboard = Some(LeaderboardResponse {
            leaderboard: None,
            items,
            start: 0,
            end: entries.len() as u32,
        });
        self
    }

    pub fn with_statistics_delay(mut self, delay: Duration) -> Self {
        self.statistics_delay = Some(delay);
        self
    }

    pub fn failing_statistics_for(mut self, match_id: &str) -> Self {
        self.failing_statistics.insert(match_id.into());
        self
    }

    pub fn failing_roster_for(mut self, match_id: &str) -> Self {
        self.failing_rosters.insert(match_id.into());
        self
    }
}

/// Statistics snapshot with one player per team.
///
/// Each player is (id, team win, [(stat key, value)]).
pub fn statistics(rounds: u32, players: &[(&str, bool, &[(&str, &str)])]) -> MatchStatistics {
    let teams: Vec<serde_json::Value> = players
        .iter()
        .map(|(id, win, stats)| {
            let stat_map: serde_json::Map<String, serde_json::Value> = stats
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
                .collect();
            serde_json::json!({
                "team_id": format!("team-{}", id),
                "team_stats": {"Team Win": if *win { "1" } else { "0" }},
                "players": [{"player_id": id, "nickname": id, "player_stats": stat_map}]
            })
        })
        .collect();
    serde_json::from_value(serde_json::json!({
        "rounds": [{"round_stats": {"Rounds": rounds.to_string()}, "teams": teams}]
    }))
    .expect("valid statistics fixture")
}

#[async_trait]
impl HubDataSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_hub_matches(
        &self,
        _hub_id: &HubId,
        offset: u32,
        limit: u32,
    ) -> Result<HubMatchesResponse, FetchError> {
        if self.fail_match_list {
            return Err(unavailable());
        }
        let items: Vec<HubMatchItem> = self
            .matches
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(HubMatchesResponse {
            start: offset,
            end: offset + items.len() as u32,
            items,
        })
    }

    async fn match_roster(&self, match_id: &MatchId) -> Result<MatchRoster, FetchError> {
        if self.failing_rosters.contains(match_id) {
            return Err(unavailable());
        }
        Ok(self.rosters.get(match_id).cloned().unwrap_or_default())
    }

    async fn match_statistics(&self, match_id: &MatchId) -> Result<MatchStatistics, FetchError> {
        self.statistics_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.statistics_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_statistics.contains(match_id) {
            return Err(unavailable());
        }
        Ok(self.statistics.get(match_id).cloned().unwrap_or_default())
    }

    async fn leaderboard(
        &self,
        _leaderboard_id: &LeaderboardId,
    ) -> Result<LeaderboardResponse, FetchError> {
        self.leaderboard.clone().ok_or_else(unavailable)
    }
}
