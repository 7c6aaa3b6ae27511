//! Deterministic tournament identifiers.
//!
//! Tournament rows carry no stable key of their own, so one is derived from
//! the columns that identify an event: game, year, event name and mode.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content-hash identifier for a tournament row.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(String);

impl TournamentId {
    /// Hash the given fields (joined with `|`) and keep the first 16 hex chars.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let digest = hex::encode(hasher.finalize());
        Self(digest[..16].to_string())
    }

    /// Identifier for a tournament from its identifying columns.
    pub fn for_tournament(game: &str, year: i32, event_name: &str, mode: &str) -> Self {
        Self::generate(&[game, &year.to_string(), event_name, mode])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TournamentId({})", self.0)
    }
}

impl From<&str> for TournamentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_id_deterministic() {
        let a = TournamentId::for_tournament("Quake 3", 2005, "QuakeCon", "Duel");
        let b = TournamentId::for_tournament("Quake 3", 2005, "QuakeCon", "Duel");
        assert_eq!(a, b);
    }

    #[test]
    fn test_tournament_id_mode_distinguishes_events() {
        let duel = TournamentId::for_tournament("Quake 3", 2005, "QuakeCon", "Duel");
        let tdm = TournamentId::for_tournament("Quake 3", 2005, "QuakeCon", "TDM");
        assert_ne!(duel, tdm);
    }

    #[test]
    fn test_tournament_id_shape() {
        let id = TournamentId::generate(&["Quake Live"]);
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tournament_id_serializes_as_plain_string() {
        let id = TournamentId::from("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
        assert_eq!(format!("{:?}", id), "TournamentId(abc123)");
    }
}
