//! Ranking presentation helpers: default ranks, column sorting, search.
//!
//! Sort keys are an explicit enum with one accessor per column.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{PlacementBucket, PlayerAggregate, RankingResult, TournamentEntry};

/// A player aggregate with its position in the default points ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub rank: u32,
    #[serde(flatten)]
    pub aggregate: PlayerAggregate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Columns of the rankings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Rank,
    Player,
    Games,
    Modes,
    First,
    Second,
    Top4,
    Top8,
    Participations,
    #[default]
    Points,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "rank" => SortKey::Rank,
            "player" => SortKey::Player,
            "games" => SortKey::Games,
            "modes" => SortKey::Modes,
            "first" | "1st" => SortKey::First,
            "second" | "2nd" => SortKey::Second,
            "top4" => SortKey::Top4,
            "top8" => SortKey::Top8,
            "participations" => SortKey::Participations,
            "points" => SortKey::Points,
            other => return Err(format!("unknown sort key: {}", other)),
        };
        Ok(key)
    }
}

impl SortKey {
    fn compare(self, a: &RankedPlayer, b: &RankedPlayer) -> Ordering {
        let (x, y) = (&a.aggregate, &b.aggregate);
        match self {
            SortKey::Rank => a.rank.cmp(&b.rank),
            SortKey::Player => x.player.cmp(&y.player),
            SortKey::Games => x.games.len().cmp(&y.games.len()),
            SortKey::Modes => x.modes.len().cmp(&y.modes.len()),
            SortKey::First => bucket_cmp(x, y, PlacementBucket::First),
            SortKey::Second => bucket_cmp(x, y, PlacementBucket::Second),
            SortKey::Top4 => bucket_cmp(x, y, PlacementBucket::Top4),
            SortKey::Top8 => bucket_cmp(x, y, PlacementBucket::Top8),
            SortKey::Participations => x.participations.cmp(&y.participations),
            SortKey::Points => x.points.cmp(&y.points),
        }
    }
}

fn bucket_cmp(a: &PlayerAggregate, b: &PlayerAggregate, bucket: PlacementBucket) -> Ordering {
    a.placements.get(bucket).cmp(&b.placements.get(bucket))
}

/// Order players by points (highest first, ties by name) and number them.
pub fn rank_players(players: Vec<PlayerAggregate>) -> Vec<RankedPlayer> {
    let mut players = players;
    players.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.player.cmp(&b.player)));
    players
        .into_iter()
        .enumerate()
        .map(|(i, aggregate)| RankedPlayer {
            rank: i as u32 + 1,
            aggregate,
        })
        .collect()
}

/// Stable sort by a column.
pub fn sort_ranked(players: &mut [RankedPlayer], key: SortKey, order: SortOrder) {
    players.sort_by(|a, b| order.apply(key.compare(a, b)));
}

/// Players whose name contains `query`, ignoring case.
pub fn search_players<'a>(players: &'a [RankedPlayer], query: &str) -> Vec<&'a RankedPlayer> {
    let query = query.to_lowercase();
    players
        .iter()
        .filter(|p| p.aggregate.player.to_lowercase().contains(&query))
        .collect()
}

/// Summary line shown above the rankings table.
pub fn filter_summary(shown_players: usize, result: &RankingResult) -> String {
    format!(
        "Showing {} players in {} tournaments ({} tournaments filtered out of {})",
        shown_players,
        result.shown_count(),
        result.filtered_count,
        result.total_count
    )
}

/// Columns of a player's per-game tournament table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentSortKey {
    EventName,
    Year,
    Placement,
    Points,
}

impl FromStr for TournamentSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "event_name" | "event" => Ok(TournamentSortKey::EventName),
            "year" => Ok(TournamentSortKey::Year),
            "placement" => Ok(TournamentSortKey::Placement),
            "points" => Ok(TournamentSortKey::Points),
            other => Err(format!("unknown tournament sort key: {}", other)),
        }
    }
}

/// Stable sort of a player's tournaments.
pub fn sort_tournaments(entries: &mut [TournamentEntry], key: TournamentSortKey, order: SortOrder) {
    entries.sort_by(|a, b| {
        let ordering = match key {
            TournamentSortKey::EventName => a.event_name.cmp(&b.event_name),
            TournamentSortKey::Year => a.year.cmp(&b.year),
            TournamentSortKey::Placement => a.slot.cmp(&b.slot),
            TournamentSortKey::Points => a.points.total_cmp(&b.points),
        };
        order.apply(ordering)
    });
}
