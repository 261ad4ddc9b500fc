//! Column ranking models.

use serde::{Deserialize, Serialize};

use super::AggregatedPlayerStats;

/// Placement of a cell value among a column's distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    First,
    Second,
    Third,
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankTier::First => write!(f, "1st"),
            RankTier::Second => write!(f, "2nd"),
            RankTier::Third => write!(f, "3rd"),
        }
    }
}

/// Top three distinct values of one column.
///
/// `None` means no value reaches that tier, so it never matches a real cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRank {
    pub first: f64,
    pub second: Option<f64>,
    pub third: Option<f64>,
}

impl ColumnRank {
    /// Build from the column's distinct values sorted descending.
    pub fn from_sorted_distinct(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        Some(Self {
            first,
            second: values.get(1).copied(),
            third: values.get(2).copied(),
        })
    }

    /// Tier held by `value`, if any.
    pub fn tier_of(&self, value: f64) -> Option<RankTier> {
        if value == self.first {
            Some(RankTier::First)
        } else if self.second == Some(value) {
            Some(RankTier::Second)
        } else if self.third == Some(value) {
            Some(RankTier::Third)
        } else {
            None
        }
    }
}

macro_rules! rank_columns {
    ($( $variant:ident => $name:literal, |$p:ident| $value:expr; )+) => {
        /// Numeric columns that receive top-three highlighting.
        ///
        /// `leaderboard_position` is left out on purpose: lower is better there,
        /// and the unranked sentinel would otherwise take first place.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum RankColumn {
            $( $variant, )+
        }

        impl RankColumn {
            /// Every rankable column, in display order.
            pub const ALL: &'static [RankColumn] = &[$(RankColumn::$variant),+];

            /// Field name as it appears in serialized player records.
            pub fn name(self) -> &'static str {
                match self {
                    $( RankColumn::$variant => $name, )+
                }
            }

            /// The column's value for one player.
            pub fn value(self, player: &AggregatedPlayerStats) -> f64 {
                match self {
                    $( RankColumn::$variant => {
                        let $p = player;
                        $value
                    } )+
                }
            }
        }
    };
}

rank_columns! {
    Points => "points", |p| p.points;
    Matches => "matches", |p| f64::from(p.matches);
    Wins => "wins", |p| f64::from(p.wins);
    WinRate => "win_rate", |p| p.win_rate;
    Rounds => "rounds", |p| f64::from(p.rounds);
    Kills => "kills", |p| p.stats.kills;
    Deaths => "deaths", |p| p.stats.deaths;
    KdRatio => "kd_ratio", |p| p.kd_ratio;
    KrRatio => "kr_ratio", |p| p.kr_ratio;
    Adr => "adr", |p| p.adr;
    HsPercent => "hs_percent", |p| p.hs_percent;
    Damage => "damage", |p| p.stats.damage;
    Headshots => "headshots", |p| p.stats.headshots;
    Assists => "assists", |p| p.stats.assists;
    Mvps => "mvps", |p| p.stats.mvps;
    DoubleKills => "double_kills", |p| p.stats.double_kills;
    TripleKills => "triple_kills", |p| p.stats.triple_kills;
    QuadroKills => "quadro_kills", |p| p.stats.quadro_kills;
    PentaKills => "penta_kills", |p| p.stats.penta_kills;
    ClutchKills => "clutch_kills", |p| p.stats.clutch_kills;
    FirstKills => "first_kills", |p| p.stats.first_kills;
    EntryCount => "entry_count", |p| p.stats.entry_count;
    OneV2Count => "one_v2_count", |p| p.stats.one_v2_count;
    OneV2Wins => "one_v2_wins", |p| p.stats.one_v2_wins;
    OneV1Count => "one_v1_count", |p| p.stats.one_v1_count;
    OneV1Wins => "one_v1_wins", |p| p.stats.one_v1_wins;
    FlashCount => "flash_count", |p| p.stats.flash_count;
    FlashSuccesses => "flash_successes", |p| p.stats.flash_successes;
    EnemiesFlashed => "enemies_flashed", |p| p.stats.enemies_flashed;
    UtilityCount => "utility_count", |p| p.stats.utility_count;
    UtilitySuccesses => "utility_successes", |p| p.stats.utility_successes;
    UtilityDamage => "utility_damage", |p| p.stats.utility_damage;
    UtilityUsagePerRound => "utility_usage_per_round", |p| p.utility_usage_per_round;
    PistolKills => "pistol_kills", |p| p.stats.pistol_kills;
    SniperKills => "sniper_kills", |p| p.stats.sniper_kills;
    KnifeKills => "knife_kills", |p| p.stats.knife_kills;
    ZeusKills => "zeus_kills", |p| p.stats.zeus_kills;
    LeaderboardWins => "leaderboard_wins", |p| f64::from(p.leaderboard_wins);
    LeaderboardPlayed => "leaderboard_played", |p| f64::from(p.leaderboard_played);
}

impl std::fmt::Display for RankColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_rank_from_values() {
        let rank = ColumnRank::from_sorted_distinct(&[100.0, 80.0]).unwrap();
        assert_eq!(rank.first, 100.0);
        assert_eq!(rank.second, Some(80.0));
        assert_eq!(rank.third, None);

        assert!(ColumnRank::from_sorted_distinct(&[]).is_none());
    }

    #[test]
    fn test_tier_of() {
        let rank = ColumnRank::from_sorted_distinct(&[9.0, 7.0, 3.0]).unwrap();
        assert_eq!(rank.tier_of(9.0), Some(RankTier::First));
        assert_eq!(rank.tier_of(7.0), Some(RankTier::Second));
        assert_eq!(rank.tier_of(3.0), Some(RankTier::Third));
        assert_eq!(rank.tier_of(1.0), None);
    }

    #[test]
    fn test_missing_tier_never_matches() {
        let rank = ColumnRank::from_sorted_distinct(&[0.0]).unwrap();
        assert_eq!(rank.tier_of(0.0), Some(RankTier::First));
        assert_eq!(rank.tier_of(f64::NEG_INFINITY), None);
        assert_eq!(rank.tier_of(-1.0), None);
    }

    #[test]
    fn test_column_names_match_serialized_fields() {
        for column in RankColumn::ALL {
            let json = serde_json::to_string(column).unwrap();
            assert_eq!(json, format!("\"{}\"", column.name()));
        }
    }

    #[test]
    fn test_leaderboard_position_is_not_rankable() {
        assert!(RankColumn::ALL.iter().all(|c| c.name() != "leaderboard_position"));
        assert_eq!(RankColumn::ALL.len(), 39);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(format!("{}", RankTier::First), "1st");
        assert_eq!(format!("{}", RankTier::Third), "3rd");
    }
}
