//! Aggregate ranking output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlacementCounts;

/// A player's totals across every scored placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    /// Player name exactly as stored
    pub player: String,

    /// Weighted points, rounded to the nearest integer
    pub points: i64,

    pub placements: PlacementCounts,

    /// Games played, in order of first appearance
    pub games: Vec<String>,

    /// Modes played, in order of first appearance
    pub modes: Vec<String>,

    /// Number of scored placements
    pub participations: u32,
}

impl PlayerAggregate {
    /// Games as a display string, e.g. `"Quake 3, Quake Live"`.
    pub fn games_joined(&self) -> String {
        self.games.join(", ")
    }

    pub fn modes_joined(&self) -> String {
        self.modes.join(", ")
    }
}

/// Result of one aggregate computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResult {
    /// Unordered player aggregates
    pub players: Vec<PlayerAggregate>,

    /// Valid records dropped by filters or visibility
    pub filtered_count: u32,

    /// Every record received, valid or not
    pub total_count: u32,

    /// Records skipped for missing columns
    pub invalid_count: u32,

    pub computed_at: DateTime<Utc>,
}

impl RankingResult {
    /// The "no data" result returned when records cannot be fetched.
    pub fn empty() -> Self {
        Self {
            players: Vec::new(),
            filtered_count: 0,
            total_count: 0,
            invalid_count: 0,
            computed_at: Utc::now(),
        }
    }

    /// Records that contributed to the ranking.
    pub fn shown_count(&self) -> u32 {
        self.total_count
            .saturating_sub(self.filtered_count)
            .saturating_sub(self.invalid_count)
    }

    /// Look up a player by exact name.
    pub fn get_player(&self, name: &str) -> Option<&PlayerAggregate> {
        self.players.iter().find(|p| p.player == name)
    }
}
