//! Tournament placement rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{RankSlot, TournamentId};

/// A row is unusable for ranking when one of its classifying columns is
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRecord {
    #[error("tournament {event:?} has no {field}")]
    MissingField { field: &'static str, event: String },
}

/// One row of the `Tournaments` table, as delivered by a record source.
///
/// Classifying columns are optional here because the source does not enforce
/// them; use [`TournamentRecord::validate`] before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    #[serde(rename = "Game", default)]
    pub game: Option<String>,

    #[serde(rename = "Mode", default)]
    pub mode: Option<String>,

    /// 1 (most prestigious) to 5
    #[serde(rename = "Tier", default)]
    pub tier: Option<u8>,

    #[serde(rename = "Year", default)]
    pub year: Option<i32>,

    #[serde(rename = "LAN", default)]
    pub lan: Option<bool>,

    #[serde(rename = "Event_Name", default)]
    pub event_name: Option<String>,

    #[serde(rename = "1st", default)]
    pub first: Option<String>,
    #[serde(rename = "2nd", default)]
    pub second: Option<String>,
    #[serde(rename = "3rd", default)]
    pub third: Option<String>,
    #[serde(rename = "4th", default)]
    pub fourth: Option<String>,
    #[serde(rename = "5th", default)]
    pub fifth: Option<String>,
    #[serde(rename = "6th", default)]
    pub sixth: Option<String>,
    #[serde(rename = "7th", default)]
    pub seventh: Option<String>,
    #[serde(rename = "8th", default)]
    pub eighth: Option<String>,
}

impl TournamentRecord {
    /// Create a record with its classifying columns set and no placements.
    pub fn new(game: &str, mode: &str, tier: u8, year: i32) -> Self {
        Self {
            game: Some(game.to_string()),
            mode: Some(mode.to_string()),
            tier: Some(tier),
            year: Some(year),
            ..Default::default()
        }
    }

    /// Builder method to set the LAN flag.
    pub fn with_lan(mut self, lan: bool) -> Self {
        self.lan = Some(lan);
        self
    }

    /// Builder method to set the event name.
    pub fn with_event_name(mut self, name: &str) -> Self {
        self.event_name = Some(name.to_string());
        self
    }

    /// Builder method to put a player in a rank slot.
    pub fn with_player(mut self, slot: RankSlot, player: &str) -> Self {
        *self.slot_mut(slot) = Some(player.to_string());
        self
    }

    fn slot_mut(&mut self, slot: RankSlot) -> &mut Option<String> {
        match slot {
            RankSlot::First => &mut self.first,
            RankSlot::Second => &mut self.second,
            RankSlot::Third => &mut self.third,
            RankSlot::Fourth => &mut self.fourth,
            RankSlot::Fifth => &mut self.fifth,
            RankSlot::Sixth => &mut self.sixth,
            RankSlot::Seventh => &mut self.seventh,
            RankSlot::Eighth => &mut self.eighth,
        }
    }

    /// Player in a rank slot; blank names count as empty.
    pub fn player_at(&self, slot: RankSlot) -> Option<&str> {
        let name = match slot {
            RankSlot::First => &self.first,
            RankSlot::Second => &self.second,
            RankSlot::Third => &self.third,
            RankSlot::Fourth => &self.fourth,
            RankSlot::Fifth => &self.fifth,
            RankSlot::Sixth => &self.sixth,
            RankSlot::Seventh => &self.seventh,
            RankSlot::Eighth => &self.eighth,
        };
        name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Occupied slots, best first.
    pub fn placements(&self) -> impl Iterator<Item = (RankSlot, &str)> + '_ {
        RankSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.player_at(slot).map(|name| (slot, name)))
    }

    /// Check the classifying columns and borrow them as a [`Tournament`].
    pub fn validate(&self) -> Result<Tournament<'_>, InvalidRecord> {
        let missing = |field: &'static str| InvalidRecord::MissingField {
            field,
            event: self.event_name.clone().unwrap_or_default(),
        };

        let game = non_blank(&self.game).ok_or_else(|| missing("game"))?;
        let mode = non_blank(&self.mode).ok_or_else(|| missing("mode"))?;
        let tier = self.tier.filter(|t| *t != 0).ok_or_else(|| missing("tier"))?;
        let year = self.year.filter(|y| *y != 0).ok_or_else(|| missing("year"))?;

        Ok(Tournament {
            game,
            mode,
            tier,
            year,
            is_lan: self.lan.unwrap_or(false),
            event_name: self.event_name.as_deref().unwrap_or(""),
            record: self,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// A validated view over a [`TournamentRecord`].
#[derive(Debug, Clone, Copy)]
pub struct Tournament<'a> {
    pub game: &'a str,
    pub mode: &'a str,
    pub tier: u8,
    pub year: i32,
    pub is_lan: bool,
    pub event_name: &'a str,
    record: &'a TournamentRecord,
}

impl<'a> Tournament<'a> {
    pub fn id(&self) -> TournamentId {
        TournamentId::for_tournament(self.game, self.year, self.event_name, self.mode)
    }

    pub fn player_at(&self, slot: RankSlot) -> Option<&'a str> {
        self.record.player_at(slot)
    }

    pub fn placements(&self) -> impl Iterator<Item = (RankSlot, &'a str)> + 'a {
        self.record.placements()
    }

    pub fn record(&self) -> &'a TournamentRecord {
        self.record
    }
}
