//! Raw records returned by the FACEIT Data API.
//!
//! These mirror the upstream JSON shapes. Every collection and map defaults
//! to empty so that schema drift between game modes never fails a decode;
//! the string-keyed stat maps are normalized into `StatLine` before they
//! reach the aggregation core.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{LeaderboardId, MatchId, PlayerId};

/// Status value of a hub match that has completed play.
pub const FINISHED_STATUS: &str = "FINISHED";

/// Page of hub matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubMatchesResponse {
    #[serde(default)]
    pub items: Vec<HubMatchItem>,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub end: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubMatchItem {
    pub match_id: MatchId,
    #[serde(default)]
    pub status: String,
}

impl HubMatchItem {
    pub fn is_finished(&self) -> bool {
        self.status == FINISHED_STATUS
    }
}

impl HubMatchesResponse {
    /// IDs of finished matches, in listing order.
    pub fn finished_match_ids(&self) -> Vec<MatchId> {
        self.items
            .iter()
            .filter(|m| m.is_finished())
            .map(|m| m.match_id.clone())
            .collect()
    }
}

/// Match metadata, used for the roster (nickname and avatar lookup).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRoster {
    #[serde(default)]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub teams: HashMap<String, RosterTeam>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterTeam {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub roster: Vec<RosterPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_id: PlayerId,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl MatchRoster {
    /// Find a player across all teams.
    pub fn find_player(&self, player_id: &PlayerId) -> Option<&RosterPlayer> {
        self.teams
            .values()
            .flat_map(|t| t.roster.iter())
            .find(|p| &p.player_id == player_id)
    }
}

/// Match statistics. Only the first round is ever consulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatistics {
    #[serde(default)]
    pub rounds: Vec<StatsRound>,
}

impl MatchStatistics {
    /// The single statistics snapshot of the match, if any.
    pub fn snapshot(&self) -> Option<&StatsRound> {
        self.rounds.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsRound {
    #[serde(default)]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub round_stats: HashMap<String, String>,
    #[serde(default)]
    pub teams: Vec<StatsTeam>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsTeam {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub team_stats: HashMap<String, String>,
    #[serde(default)]
    pub players: Vec<StatsPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsPlayer {
    #[serde(default)]
    pub player_id: PlayerId,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub player_stats: HashMap<String, String>,
}

/// Leaderboard page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub leaderboard: Option<LeaderboardMeta>,
    #[serde(default)]
    pub items: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub end: u32,
}

/// Leaderboard descriptor. Only the fields the dashboard shows are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardMeta {
    pub leaderboard_id: LeaderboardId,
    #[serde(default)]
    pub leaderboard_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub points_per_win: f64,
    #[serde(default)]
    pub points_per_loss: f64,
    #[serde(default)]
    pub points_per_draw: f64,
    #[serde(default)]
    pub starting_points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: LeaderboardPlayer,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default)]
    pub draw: u32,
    #[serde(default)]
    pub points: f64,
    /// Fraction in 0..=1.
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub current_streak: i32,
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardPlayer {
    pub user_id: PlayerId,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub skill_level: Option<u32>,
    #[serde(default)]
    pub faceit_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_match_ids_filters_status() {
        let json = r#"{
            "items": [
                {"match_id": "m1", "status": "FINISHED"},
                {"match_id": "m2", "status": "ONGOING"},
                {"match_id": "m3", "status": "CANCELLED"},
                {"match_id": "m4", "status": "FINISHED"}
            ],
            "start": 0,
            "end": 4
        }"#;
        let resp: HubMatchesResponse = serde_json::from_str(json).unwrap();
        let ids = resp.finished_match_ids();

        assert_eq!(ids, vec![MatchId::from("m1"), MatchId::from("m4")]);
    }

    #[test]
    fn test_match_statistics_tolerates_missing_fields() {
        let json = r#"{"rounds": [{"round_stats": {"Rounds": "24"}}]}"#;
        let stats: MatchStatistics = serde_json::from_str(json).unwrap();
        let round = stats.snapshot().unwrap();

        assert!(round.teams.is_empty());
        assert_eq!(round.round_stats.get("Rounds").map(String::as_str), Some("24"));
    }

    #[test]
    fn test_empty_statistics_has_no_snapshot() {
        let stats: MatchStatistics = serde_json::from_str("{}").unwrap();
        assert!(stats.snapshot().is_none());
    }

    #[test]
    fn test_roster_find_player() {
        let json = r#"{
            "match_id": "m1",
            "teams": {
                "faction1": {"roster": [{"player_id": "p1", "nickname": "alpha", "avatar": "a.png"}]},
                "faction2": {"roster": [{"player_id": "p2", "nickname": "bravo"}]}
            }
        }"#;
        let roster: MatchRoster = serde_json::from_str(json).unwrap();

        let p2 = roster.find_player(&PlayerId::from("p2")).unwrap();
        assert_eq!(p2.nickname, "bravo");
        assert!(p2.avatar.is_none());
        assert!(roster.find_player(&PlayerId::from("p3")).is_none());
    }

    #[test]
    fn test_leaderboard_entry_decode() {
        let json = r#"{
            "leaderboard": {"leaderboard_id": "lb1", "leaderboard_name": "Season 1"},
            "items": [{
                "player": {"user_id": "p1", "nickname": "alpha", "skill_level": 7},
                "played": 10, "won": 7, "lost": 3, "draw": 0,
                "points": 21, "win_rate": 0.7, "current_streak": 2, "position": 1
            }],
            "start": 0, "end": 1
        }"#;
        let board: LeaderboardResponse = serde_json::from_str(json).unwrap();
        let entry = &board.items[0];

        assert_eq!(entry.player.user_id.as_str(), "p1");
        assert_eq!(entry.points, 21.0);
        assert_eq!(entry.position, 1);
        assert_eq!(board.leaderboard.unwrap().leaderboard_name, "Season 1");
    }
}
