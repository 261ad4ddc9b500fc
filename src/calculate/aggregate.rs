//! Cross-match aggregation.

use std::collections::HashMap;

use crate::models::{AggregatedPlayerStats, MatchRoster, MatchStatistics, PlayerId, PlayerMatchRecord};

use super::normalize::normalize_match;
use super::{calculate_kd_ratio, calculate_percentage, calculate_rate};

/// Running per-player totals, kept in first-seen order.
#[derive(Debug, Default)]
pub struct PlayerTable {
    players: Vec<AggregatedPlayerStats>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one player's match record into the table.
    pub fn record(&mut self, record: PlayerMatchRecord) {
        match self.index.get(&record.player_id) {
            Some(&i) => self.players[i].absorb(&record),
            None => {
                self.index
                    .insert(record.player_id.clone(), self.players.len());
                self.players
                    .push(AggregatedPlayerStats::from_first_match(record));
            }
        }
    }

    /// Fold every record of one match.
    pub fn record_match(&mut self, roster: &MatchRoster, stats: &MatchStatistics) {
        for record in normalize_match(roster, stats) {
            self.record(record);
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&AggregatedPlayerStats> {
        self.index.get(player_id).map(|&i| &self.players[i])
    }

    /// Finish folding: compute derived metrics once and hand out the rows.
    pub fn finish(mut self) -> Vec<AggregatedPlayerStats> {
        for player in &mut self.players {
            derive_metrics(player);
        }
        self.players
    }
}

/// Compute rate and ratio fields from the accumulated totals.
pub fn derive_metrics(player: &mut AggregatedPlayerStats) {
    let rounds = f64::from(player.rounds);
    let s = &player.stats;

    player.win_rate = calculate_percentage(f64::from(player.wins), f64::from(player.matches));
    player.kd_ratio = calculate_kd_ratio(s.kills, s.deaths);
    player.kr_ratio = calculate_rate(s.kills, rounds);
    player.adr = calculate_rate(s.damage, rounds);
    player.hs_percent = calculate_percentage(s.headshots, s.kills);
    player.utility_usage_per_round = calculate_rate(s.utility_count, rounds);
}

/// Aggregate every (roster, statistics) pair into one row per player.
pub fn aggregate_matches<'a, I>(matches: I) -> Vec<AggregatedPlayerStats>
where
    I: IntoIterator<Item = (&'a MatchRoster, &'a MatchStatistics)>,
{
    let mut table = PlayerTable::new();
    for (roster, stats) in matches {
        table.record_match(roster, stats);
    }
    table.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::statistics;
    use crate::models::StatLine;
    use pretty_assertions::assert_eq;

    fn record(id: &str, win: bool, rounds: u32, stats: StatLine) -> PlayerMatchRecord {
        PlayerMatchRecord {
            player_id: id.into(),
            nickname: id.to_uppercase(),
            avatar: None,
            team_win: win,
            rounds,
            stats,
        }
    }

    fn kd(kills: f64, deaths: f64) -> StatLine {
        StatLine {
            kills,
            deaths,
            ..Default::default()
        }
    }

    #[test]
    fn test_two_match_scenario() {
        let mut table = PlayerTable::new();
        table.record(record("p", true, 13, kd(10.0, 5.0)));
        table.record(record("p", false, 16, kd(6.0, 10.0)));
        let players = table.finish();

        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.stats.kills, 16.0);
        assert_eq!(p.stats.deaths, 15.0);
        assert_eq!(p.rounds, 29);
        assert_eq!(p.matches, 2);
        assert_eq!(p.wins, 1);
        assert_eq!(p.win_rate, 50.0);
        assert!((p.kd_ratio - 16.0 / 15.0).abs() < 1e-9);
        assert!((p.kr_ratio - 16.0 / 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_deaths_kd_equals_kills() {
        let mut table = PlayerTable::new();
        table.record(record("p", true, 10, kd(4.0, 0.0)));
        table.record(record("p", true, 12, kd(3.0, 0.0)));
        let players = table.finish();

        assert_eq!(players[0].kd_ratio, 7.0);
    }

    #[test]
    fn test_derived_metrics_use_final_totals() {
        // Averaging per-match ADRs (100 and 50) would give 75; the total gives 60.
        let mut table = PlayerTable::new();
        table.record(record(
            "p",
            true,
            10,
            StatLine {
                damage: 1000.0,
                kills: 10.0,
                headshots: 10.0,
                utility_count: 5.0,
                ..Default::default()
            },
        ));
        table.record(record(
            "p",
            false,
            40,
            StatLine {
                damage: 2000.0,
                kills: 10.0,
                headshots: 0.0,
                utility_count: 20.0,
                ..Default::default()
            },
        ));
        let p = &table.finish()[0];

        assert_eq!(p.adr, 60.0);
        assert_eq!(p.hs_percent, 50.0);
        assert_eq!(p.utility_usage_per_round, 0.5);
    }

    #[test]
    fn test_zero_rounds_and_kills() {
        let mut table = PlayerTable::new();
        table.record(record("p", false, 0, StatLine::default()));
        let p = &table.finish()[0];

        assert_eq!(p.kr_ratio, 0.0);
        assert_eq!(p.adr, 0.0);
        assert_eq!(p.hs_percent, 0.0);
        assert_eq!(p.utility_usage_per_round, 0.0);
        assert_eq!(p.win_rate, 0.0);
        assert_eq!(p.kd_ratio, 0.0);
    }

    #[test]
    fn test_insertion_order_is_first_seen() {
        let mut table = PlayerTable::new();
        table.record(record("b", true, 1, StatLine::default()));
        table.record(record("a", true, 1, StatLine::default()));
        table.record(record("b", true, 1, StatLine::default()));
        table.record(record("c", true, 1, StatLine::default()));

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&"b".into()).unwrap().matches, 2);

        let ids: Vec<String> = table
            .finish()
            .into_iter()
            .map(|p| p.player_id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let roster = MatchRoster::default();
        let a = statistics(
            13,
            &[
                ("p1", true, &[("Kills", "10"), ("Deaths", "5"), ("Damage", "1300")]),
                ("p2", false, &[("Kills", "4"), ("Assists", "3")]),
            ],
        );
        let b = statistics(
            16,
            &[
                ("p1", false, &[("Kills", "6"), ("Deaths", "10"), ("Damage", "800.5")]),
                ("p3", true, &[("Kills", "20"), ("MVPs", "5")]),
            ],
        );
        let c = statistics(19, &[("p2", true, &[("Kills", "9"), ("Assists", "2")])]);

        let mut forward = aggregate_matches([(&roster, &a), (&roster, &b), (&roster, &c)]);
        let mut backward = aggregate_matches([(&roster, &c), (&roster, &b), (&roster, &a)]);
        forward.sort_by(|x, y| x.player_id.cmp(&y.player_id));
        backward.sort_by(|x, y| x.player_id.cmp(&y.player_id));
        assert_eq!(forward, backward);

        let p1 = &forward[0];
        assert_eq!(p1.stats.kills, 16.0);
        assert_eq!(p1.stats.damage, 2100.5);
        assert_eq!(p1.rounds, 29);

        let p2 = &forward[1];
        assert_eq!(p2.matches, 2);
        assert_eq!(p2.wins, 1);
        assert_eq!(p2.stats.assists, 5.0);
        assert_eq!(p2.rounds, 32);
    }

    #[test]
    fn test_aggregate_no_matches() {
        let players = aggregate_matches(Vec::<(&MatchRoster, &MatchStatistics)>::new());
        assert!(players.is_empty());
    }
}
