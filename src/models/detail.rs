//! Per-player detail output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlacementBucket, RankSlot, TournamentId};

/// Placement statistics for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_tournaments: u32,
    pub first_places: u32,
    pub second_places: u32,
    pub top4: u32,
    pub top8: u32,
    pub total_placements: u32,
    pub grand_finals: u32,

    /// Mean placement value, `None` without placements
    pub average_placement: Option<f64>,

    /// Percentage of grand finals won, `None` without grand finals
    pub grand_final_win_rate: Option<f64>,
}

impl PlayerStats {
    /// Average placement with two decimals, or `N/A`.
    pub fn average_placement_display(&self) -> String {
        match self.average_placement {
            Some(avg) => format!("{:.2}", avg),
            None => "N/A".to_string(),
        }
    }

    /// Grand-final win rate like `75.00%`, or `N/A`.
    pub fn grand_final_win_rate_display(&self) -> String {
        match self.grand_final_win_rate {
            Some(rate) => format!("{:.2}%", rate),
            None => "N/A".to_string(),
        }
    }
}

/// One tournament on a player page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentEntry {
    pub id: TournamentId,
    pub event_name: String,
    pub game: String,
    pub mode: String,
    pub tier: u8,
    pub year: i32,
    pub is_lan: bool,

    /// Best slot the player held
    pub slot: RankSlot,

    pub bucket: PlacementBucket,

    /// Weighted points for this result, unrounded
    pub points: f64,
}

impl TournamentEntry {
    /// Bucket label, e.g. `Top4`.
    pub fn placement_label(&self) -> &'static str {
        self.bucket.label()
    }
}

/// All of a player's results in one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameGroup {
    /// Sum of entry points, rounded to one decimal
    pub total_points: f64,
    pub tournaments: Vec<TournamentEntry>,
}

/// Everything shown on a player page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetail {
    /// Name as requested
    pub player: String,

    pub stats: PlayerStats,

    /// Total points, rounded to one decimal
    pub rounded_points: f64,

    /// Active years, e.g. `2001-2003, 2005`
    pub year_ranges: String,

    pub grouped_by_game: BTreeMap<String, GameGroup>,
}

impl PlayerDetail {
    /// Detail for a player with no matching results.
    pub fn empty(player: &str) -> Self {
        Self {
            player: player.to_string(),
            ..Default::default()
        }
    }

    pub fn has_results(&self) -> bool {
        self.stats.total_tournaments > 0
    }
}
