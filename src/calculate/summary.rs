//! Single-match scoreboard.

use serde::Serialize;

use crate::models::{parse_count, parse_stat, MatchId, MatchStatistics, PlayerId};

const UNKNOWN: &str = "Unknown";

/// Scoreboard of one match, built from its statistics snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub match_id: Option<MatchId>,
    pub map: String,
    pub region: String,
    pub score: String,
    pub rounds: u32,
    pub teams: Vec<TeamSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub team_id: String,
    pub name: String,
    pub win: bool,
    pub final_score: u32,
    pub players: Vec<PlayerLine>,
}

/// One scoreboard row. Optional fields are absent upstream for some modes.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerLine {
    pub player_id: PlayerId,
    pub nickname: String,
    pub kills: f64,
    pub deaths: f64,
    pub adr: Option<f64>,
    pub result: Option<f64>,
    pub headshots: Option<f64>,
    pub hs_percent: Option<f64>,
    pub mvps: Option<f64>,
    pub kd_ratio: Option<f64>,
    pub kr_ratio: Option<f64>,
}

impl TeamSummary {
    pub fn total_kills(&self) -> f64 {
        self.players.iter().map(|p| p.kills).sum()
    }

    /// Mean ADR over players that report one.
    pub fn average_adr(&self) -> Option<f64> {
        let values: Vec<f64> = self.players.iter().filter_map(|p| p.adr).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Player with the most kills; the earliest listed wins ties.
    pub fn top_fragger(&self) -> Option<&PlayerLine> {
        self.players
            .iter()
            .fold(None, |top: Option<&PlayerLine>, p| match top {
                Some(t) if t.kills >= p.kills => Some(t),
                _ => Some(p),
            })
    }
}

fn optional_stat(stats: &std::collections::HashMap<String, String>, key: &str) -> Option<f64> {
    stats.get(key).map(|v| parse_stat(Some(v)))
}

/// Build the scoreboard for a match.
pub fn summarize_match(stats: &MatchStatistics) -> MatchSummary {
    let Some(round) = stats.snapshot() else {
        return MatchSummary {
            match_id: None,
            map: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            score: String::new(),
            rounds: 0,
            teams: Vec::new(),
        };
    };

    let rs = &round.round_stats;
    let teams = round
        .teams
        .iter()
        .map(|t| {
            let ts = &t.team_stats;
            let players = t
                .players
                .iter()
                .map(|p| {
                    let ps = &p.player_stats;
                    let kills = parse_stat(ps.get("Kills"));
                    let deaths = parse_stat(ps.get("Deaths"));
                    let kd_ratio = optional_stat(ps, "K/D Ratio")
                        .or_else(|| (deaths > 0.0).then(|| kills / deaths));

                    PlayerLine {
                        player_id: p.player_id.clone(),
                        nickname: p.nickname.clone(),
                        kills,
                        deaths,
                        adr: optional_stat(ps, "ADR"),
                        result: optional_stat(ps, "Result"),
                        headshots: optional_stat(ps, "Headshots"),
                        hs_percent: optional_stat(ps, "Headshots %"),
                        mvps: optional_stat(ps, "MVPs"),
                        kd_ratio,
                        kr_ratio: optional_stat(ps, "K/R Ratio"),
                    }
                })
                .collect();

            TeamSummary {
                team_id: t.team_id.clone(),
                name: ts.get("Team").cloned().unwrap_or_else(|| t.team_id.clone()),
                win: ts.get("Team Win").map(String::as_str) == Some("1"),
                final_score: parse_count(ts.get("Final Score")),
                players,
            }
        })
        .collect();

    MatchSummary {
        match_id: round.match_id.clone(),
        map: rs.get("Map").cloned().unwrap_or_else(|| UNKNOWN.to_string()),
        region: rs.get("Region").cloned().unwrap_or_else(|| UNKNOWN.to_string()),
        score: rs.get("Score").cloned().unwrap_or_default(),
        rounds: parse_count(rs.get("Rounds")),
        teams,
    }
}
