//! Rank slots and placement buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight rank columns of a tournament row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankSlot {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "7th")]
    Seventh,
    #[serde(rename = "8th")]
    Eighth,
}

impl RankSlot {
    /// All slots, best first.
    pub const ALL: [RankSlot; 8] = [
        RankSlot::First,
        RankSlot::Second,
        RankSlot::Third,
        RankSlot::Fourth,
        RankSlot::Fifth,
        RankSlot::Sixth,
        RankSlot::Seventh,
        RankSlot::Eighth,
    ];

    /// Column label as stored in the tournament table.
    pub fn label(&self) -> &'static str {
        match self {
            RankSlot::First => "1st",
            RankSlot::Second => "2nd",
            RankSlot::Third => "3rd",
            RankSlot::Fourth => "4th",
            RankSlot::Fifth => "5th",
            RankSlot::Sixth => "6th",
            RankSlot::Seventh => "7th",
            RankSlot::Eighth => "8th",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.label() == label)
    }

    /// Bucket this slot scores in.
    pub fn bucket(&self) -> PlacementBucket {
        match self {
            RankSlot::First => PlacementBucket::First,
            RankSlot::Second => PlacementBucket::Second,
            RankSlot::Third | RankSlot::Fourth => PlacementBucket::Top4,
            RankSlot::Fifth | RankSlot::Sixth | RankSlot::Seventh | RankSlot::Eighth => {
                PlacementBucket::Top8
            }
        }
    }
}

impl fmt::Display for RankSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring bucket a rank slot falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementBucket {
    First,
    Second,
    Top4,
    Top8,
}

impl PlacementBucket {
    /// Buckets in scoring order.
    pub const ALL: [PlacementBucket; 4] = [
        PlacementBucket::First,
        PlacementBucket::Second,
        PlacementBucket::Top4,
        PlacementBucket::Top8,
    ];

    /// Rank slots belonging to this bucket.
    pub fn slots(&self) -> &'static [RankSlot] {
        match self {
            PlacementBucket::First => &[RankSlot::First],
            PlacementBucket::Second => &[RankSlot::Second],
            PlacementBucket::Top4 => &[RankSlot::Third, RankSlot::Fourth],
            PlacementBucket::Top8 => &[
                RankSlot::Fifth,
                RankSlot::Sixth,
                RankSlot::Seventh,
                RankSlot::Eighth,
            ],
        }
    }

    /// Configuration key (`first`, `second`, `top4`, `top8`).
    pub fn key(&self) -> &'static str {
        match self {
            PlacementBucket::First => "first",
            PlacementBucket::Second => "second",
            PlacementBucket::Top4 => "top4",
            PlacementBucket::Top8 => "top8",
        }
    }

    /// Label shown next to a tournament on a player page.
    pub fn label(&self) -> &'static str {
        match self {
            PlacementBucket::First => "1st",
            PlacementBucket::Second => "2nd",
            PlacementBucket::Top4 => "Top4",
            PlacementBucket::Top8 => "Top8",
        }
    }

    /// Representative finishing position used for average placement.
    /// Shared buckets use the midpoint of their slots.
    pub fn placement_value(&self) -> f64 {
        match self {
            PlacementBucket::First => 1.0,
            PlacementBucket::Second => 2.0,
            PlacementBucket::Top4 => 3.5,
            PlacementBucket::Top8 => 6.5,
        }
    }

    /// Whether this bucket is a grand-final appearance.
    pub fn is_grand_final(&self) -> bool {
        matches!(self, PlacementBucket::First | PlacementBucket::Second)
    }
}

impl fmt::Display for PlacementBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-bucket placement counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCounts {
    pub first: u32,
    pub second: u32,
    pub top4: u32,
    pub top8: u32,
}

impl PlacementCounts {
    pub fn get(&self, bucket: PlacementBucket) -> u32 {
        match bucket {
            PlacementBucket::First => self.first,
            PlacementBucket::Second => self.second,
            PlacementBucket::Top4 => self.top4,
            PlacementBucket::Top8 => self.top8,
        }
    }

    pub fn increment(&mut self, bucket: PlacementBucket) {
        match bucket {
            PlacementBucket::First => self.first += 1,
            PlacementBucket::Second => self.second += 1,
            PlacementBucket::Top4 => self.top4 += 1,
            PlacementBucket::Top8 => self.top8 += 1,
        }
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u32 {
        self.first + self.second + self.top4 + self.top8
    }
}
