//! Scoring configuration.
//!
//! A [`ScoringConfig`] is a complete, immutable snapshot of everything that
//! influences a ranking: base points per bucket, weights, visibility toggles
//! and filters. Every computation takes one explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PlacementBucket;

/// Games tracked by default, in display order.
pub const DEFAULT_GAMES: [&str; 7] = [
    "Quake World",
    "Quake 2",
    "Quake 3",
    "Quake 4",
    "Quake Live",
    "Quake Champions",
    "Diabotical",
];

/// Known game modes.
pub const KNOWN_MODES: [&str; 8] = ["Duel", "2v2", "TDM", "CTF", "CA", "SAC", "WIP", "DBT"];

/// Weight applied when a game or tier has no configured weight.
pub const NEUTRAL_WEIGHT: f64 = 100.0;

/// Base points per placement bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsTable {
    #[serde(default = "default_first_points")]
    pub first: f64,
    #[serde(default = "default_second_points")]
    pub second: f64,
    #[serde(default = "default_top4_points")]
    pub top4: f64,
    #[serde(default = "default_top8_points")]
    pub top8: f64,
}

fn default_first_points() -> f64 {
    100.0
}

fn default_second_points() -> f64 {
    50.0
}

fn default_top4_points() -> f64 {
    25.0
}

fn default_top8_points() -> f64 {
    10.0
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            first: default_first_points(),
            second: default_second_points(),
            top4: default_top4_points(),
            top8: default_top8_points(),
        }
    }
}

impl PointsTable {
    pub fn get(&self, bucket: PlacementBucket) -> f64 {
        match bucket {
            PlacementBucket::First => self.first,
            PlacementBucket::Second => self.second,
            PlacementBucket::Top4 => self.top4,
            PlacementBucket::Top8 => self.top8,
        }
    }
}

/// Which placement buckets count at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketVisibility {
    #[serde(default = "visible")]
    pub first: bool,
    #[serde(default = "visible")]
    pub second: bool,
    #[serde(default = "visible")]
    pub top4: bool,
    #[serde(default = "visible")]
    pub top8: bool,
}

fn visible() -> bool {
    true
}

impl Default for BucketVisibility {
    fn default() -> Self {
        Self {
            first: true,
            second: true,
            top4: true,
            top8: true,
        }
    }
}

impl BucketVisibility {
    pub fn is_visible(&self, bucket: PlacementBucket) -> bool {
        match bucket {
            PlacementBucket::First => self.first,
            PlacementBucket::Second => self.second,
            PlacementBucket::Top4 => self.top4,
            PlacementBucket::Top8 => self.top8,
        }
    }

    /// Copy with one bucket toggled.
    pub fn with(mut self, bucket: PlacementBucket, visible: bool) -> Self {
        match bucket {
            PlacementBucket::First => self.first = visible,
            PlacementBucket::Second => self.second = visible,
            PlacementBucket::Top4 => self.top4 = visible,
            PlacementBucket::Top8 => self.top8 = visible,
        }
        self
    }
}

/// Record filters. `None` for game or mode means "All".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, with = "all_or_name")]
    pub game: Option<String>,

    #[serde(default, with = "all_or_name")]
    pub mode: Option<String>,

    /// Inclusive `[min, max]`
    #[serde(default = "default_year_range")]
    pub year_range: (i32, i32),

    #[serde(default)]
    pub lan_only: bool,
}

fn default_year_range() -> (i32, i32) {
    (1996, 2025)
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            game: None,
            mode: None,
            year_range: default_year_range(),
            lan_only: false,
        }
    }
}

impl Filters {
    /// Interpret a user selection where `All` (any case) or blank means no filter.
    pub fn selection(value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Serialize `None` as `"All"` so filters read the same way users pick them.
mod all_or_name {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or("All"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(super::Filters::selection))
    }
}

/// Complete configuration for one ranking computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub points: PointsTable,

    #[serde(default)]
    pub points_visibility: BucketVisibility,

    /// Game name to weight percentage
    #[serde(default = "default_game_weights")]
    pub game_weights: BTreeMap<String, f64>,

    #[serde(default)]
    pub game_visibility: BTreeMap<String, bool>,

    /// Tier to weight percentage
    #[serde(default = "default_tier_weights", with = "tier_keys")]
    pub tier_weights: BTreeMap<u8, f64>,

    #[serde(default, with = "tier_keys")]
    pub tier_visibility: BTreeMap<u8, bool>,

    #[serde(default)]
    pub filters: Filters,
}

fn default_game_weights() -> BTreeMap<String, f64> {
    DEFAULT_GAMES
        .iter()
        .map(|g| (g.to_string(), NEUTRAL_WEIGHT))
        .collect()
}

fn default_tier_weights() -> BTreeMap<u8, f64> {
    BTreeMap::from([(1, 100.0), (2, 60.0), (3, 35.0), (4, 20.0), (5, 10.0)])
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points: PointsTable::default(),
            points_visibility: BucketVisibility::default(),
            game_weights: default_game_weights(),
            game_visibility: BTreeMap::new(),
            tier_weights: default_tier_weights(),
            tier_visibility: BTreeMap::new(),
            filters: Filters::default(),
        }
    }
}

impl ScoringConfig {
    /// Weight percentage for a game; unknown games are neutral.
    pub fn game_weight(&self, game: &str) -> f64 {
        self.game_weights.get(game).copied().unwrap_or(NEUTRAL_WEIGHT)
    }

    /// Weight percentage for a tier; unknown tiers are neutral.
    pub fn tier_weight(&self, tier: u8) -> f64 {
        self.tier_weights.get(&tier).copied().unwrap_or(NEUTRAL_WEIGHT)
    }

    /// Only an explicit `false` hides a game.
    pub fn is_game_visible(&self, game: &str) -> bool {
        self.game_visibility.get(game).copied().unwrap_or(true)
    }

    /// Only an explicit `false` hides a tier.
    pub fn is_tier_visible(&self, tier: u8) -> bool {
        self.tier_visibility.get(&tier).copied().unwrap_or(true)
    }

    /// Same scoring with a different filter set, e.g. for a player page.
    pub fn with_filters(&self, filters: Filters) -> Self {
        Self {
            filters,
            ..self.clone()
        }
    }

    /// Every weight set to neutral.
    pub fn neutral_weights(mut self) -> Self {
        self.game_weights.clear();
        self.tier_weights.clear();
        self
    }
}

/// Tier-keyed maps use string keys on the wire (TOML tables require them).
mod tier_keys {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<V, S>(map: &BTreeMap<u8, V>, s: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        let keyed: BTreeMap<String, &V> = map.iter().map(|(k, v)| (k.to_string(), v)).collect();
        keyed.serialize(s)
    }

    pub fn deserialize<'de, V, D>(d: D) -> Result<BTreeMap<u8, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let keyed = BTreeMap::<String, V>::deserialize(d)?;
        keyed
            .into_iter()
            .map(|(k, v)| {
                k.trim()
                    .parse::<u8>()
                    .map(|tier| (tier, v))
                    .map_err(|_| D::Error::custom(format!("invalid tier key: {k:?}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.points.first, 100.0);
        assert_eq!(config.points.top8, 10.0);
        assert!(config.points_visibility.is_visible(PlacementBucket::Top4));
        assert_eq!(config.tier_weight(2), 60.0);
        assert_eq!(config.game_weight("Diabotical"), 100.0);
        assert_eq!(config.filters.year_range, (1996, 2025));
        assert!(config.filters.game.is_none());
    }

    #[test]
    fn test_unknown_keys_are_neutral_and_visible() {
        let config = ScoringConfig::default();

        assert_eq!(config.game_weight("Unreal Tournament"), NEUTRAL_WEIGHT);
        assert_eq!(config.tier_weight(9), NEUTRAL_WEIGHT);
        assert!(config.is_game_visible("Unreal Tournament"));
        assert!(config.is_tier_visible(9));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "points": { "first": 200 },
            "points_visibility": { "top4": false },
            "tier_weights": { "1": 100, "2": 50 },
            "tier_visibility": { "5": false },
            "filters": { "game": "All", "mode": "CTF", "lan_only": true }
        }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.points.first, 200.0);
        assert_eq!(config.points.second, 50.0);
        assert!(!config.points_visibility.top4);
        assert!(config.points_visibility.top8);
        assert_eq!(config.tier_weight(2), 50.0);
        assert_eq!(config.tier_weight(3), NEUTRAL_WEIGHT);
        assert!(!config.is_tier_visible(5));
        assert_eq!(config.filters.game, None);
        assert_eq!(config.filters.mode.as_deref(), Some("CTF"));
        assert!(config.filters.lan_only);
        assert_eq!(config.game_weight("Quake 3"), 100.0);
    }

    #[test]
    fn test_bad_tier_key_rejected() {
        let json = r#"{ "tier_weights": { "elite": 100 } }"#;
        assert!(serde_json::from_str::<ScoringConfig>(json).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScoringConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: ScoringConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_filter_selection() {
        assert_eq!(Filters::selection("All"), None);
        assert_eq!(Filters::selection("all"), None);
        assert_eq!(Filters::selection(""), None);
        assert_eq!(Filters::selection("Quake 4"), Some("Quake 4".to_string()));
    }

    #[test]
    fn test_with_filters_keeps_scoring() {
        let config = ScoringConfig::default();
        let filters = Filters {
            lan_only: true,
            ..Filters::default()
        };
        let detail = config.with_filters(filters);

        assert!(detail.filters.lan_only);
        assert_eq!(detail.points, config.points);
        assert_eq!(detail.tier_weights, config.tier_weights);
    }

    #[test]
    fn test_bucket_visibility_with() {
        let vis = BucketVisibility::default().with(PlacementBucket::Second, false);
        assert!(!vis.is_visible(PlacementBucket::Second));
        assert!(vis.is_visible(PlacementBucket::First));
    }
}
