//! Scoring policy.
//!
//! Points are `base * tier_weight / 100 * game_weight / 100`. Weights are
//! percentages; absent keys weigh 100. Signed weights pass through unchanged.

use crate::models::{PlacementBucket, ScoringConfig};

/// Weighted points for one placement.
pub fn points_for(bucket: PlacementBucket, tier: u8, game: &str, config: &ScoringConfig) -> f64 {
    let base = config.points.get(bucket);
    let tier_factor = config.tier_weight(tier) / 100.0;
    let game_factor = config.game_weight(game) / 100.0;
    base * tier_factor * game_factor
}

/// Whether placements in this bucket count at all.
pub fn bucket_counts(bucket: PlacementBucket, config: &ScoringConfig) -> bool {
    config.points_visibility.is_visible(bucket)
}

/// Round to the nearest integer, halves away from zero.
pub fn round_whole(points: f64) -> i64 {
    points.round() as i64
}

/// Round to one decimal place, halves away from zero.
pub fn round_tenth(points: f64) -> f64 {
    (points * 10.0).round() / 10.0
}
