//! Table ordering and per-column top-three tiers.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{AggregatedPlayerStats, ColumnRank, RankColumn, RankedPlayer};

/// Order the table by leaderboard standing.
///
/// When any player has positive points: points, then wins, then matches,
/// all descending. Otherwise the first-seen order is kept as is. The sort is
/// stable, so full ties also keep first-seen order.
pub fn sort_players(players: &mut [AggregatedPlayerStats]) {
    let has_points = players.iter().any(|p| p.points > 0.0);
    if !has_points {
        return;
    }

    players.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| b.wins.cmp(&a.wins))
            .then_with(|| b.matches.cmp(&a.matches))
    });
}

/// Distinct values of a column, largest first.
fn distinct_descending(players: &[AggregatedPlayerStats], column: RankColumn) -> Vec<f64> {
    let mut values: Vec<f64> = players
        .iter()
        .map(|p| column.value(p))
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    values.dedup();
    values
}

/// Top three distinct values for every rankable column.
///
/// Columns are omitted when there are no players.
pub fn compute_column_ranks(players: &[AggregatedPlayerStats]) -> BTreeMap<RankColumn, ColumnRank> {
    RankColumn::ALL
        .iter()
        .filter_map(|&column| {
            ColumnRank::from_sorted_distinct(&distinct_descending(players, column))
                .map(|rank| (column, rank))
        })
        .collect()
}

/// Sort the players and annotate every cell that holds a top-three value.
pub fn rank_players(
    mut players: Vec<AggregatedPlayerStats>,
) -> (Vec<RankedPlayer>, BTreeMap<RankColumn, ColumnRank>) {
    sort_players(&mut players);
    let column_ranks = compute_column_ranks(&players);

    let ranked = players
        .into_iter()
        .enumerate()
        .map(|(i, stats)| {
            let tiers = column_ranks
                .iter()
                .filter_map(|(&column, rank)| {
                    rank.tier_of(column.value(&stats)).map(|tier| (column, tier))
                })
                .collect();
            RankedPlayer {
                position: i as u32 + 1,
                stats,
                tiers,
            }
        })
        .collect();

    (ranked, column_ranks)
}
