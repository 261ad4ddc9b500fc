//! Per-match normalization of upstream statistics.

use std::collections::HashMap;

use crate::models::{
    parse_count, MatchRoster, MatchStatistics, PlayerId, PlayerMatchRecord, RosterPlayer,
    StatLine,
};

const ROUNDS_KEY: &str = "Rounds";
const TEAM_WIN_KEY: &str = "Team Win";

/// Produce one record per player of the match's statistics snapshot.
///
/// Only `rounds[0]` is read. A match without statistics or without teams
/// yields no records.
pub fn normalize_match(roster: &MatchRoster, stats: &MatchStatistics) -> Vec<PlayerMatchRecord> {
    let Some(round) = stats.snapshot() else {
        return Vec::new();
    };

    let rounds = parse_count(round.round_stats.get(ROUNDS_KEY));

    let lookup: HashMap<&PlayerId, &RosterPlayer> = roster
        .teams
        .values()
        .flat_map(|t| t.roster.iter())
        .map(|p| (&p.player_id, p))
        .collect();

    let mut records = Vec::new();
    for team in &round.teams {
        let team_win = team.team_stats.get(TEAM_WIN_KEY).map(String::as_str) == Some("1");

        for player in &team.players {
            if player.player_id.is_empty() {
                continue;
            }

            let base = lookup.get(&player.player_id);
            let nickname = base
                .map(|b| b.nickname.as_str())
                .filter(|n| !n.is_empty())
                .unwrap_or(player.nickname.as_str())
                .to_string();
            let avatar = base
                .and_then(|b| b.avatar.clone())
                .filter(|a| !a.is_empty());

            records.push(PlayerMatchRecord {
                player_id: player.player_id.clone(),
                nickname,
                avatar,
                team_win,
                rounds,
                stats: StatLine::from_stat_map(&player.player_stats),
            });
        }
    }

    records
}
