//! Player detail computation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    GameGroup, PlacementBucket, PlayerDetail, PlayerStats, RankSlot, ScoringConfig,
    TournamentEntry, TournamentRecord,
};

use super::{filter, scoring, years};

/// Compute a player's page: placement statistics, points and results grouped
/// by game.
///
/// Unlike the aggregate ranking, the name matches rank slots
/// case-insensitively. A tournament where the player holds a slot in a hidden
/// bucket is left out entirely.
pub fn compute_detail(
    player_name: &str,
    records: &[TournamentRecord],
    config: &ScoringConfig,
) -> PlayerDetail {
    if player_name.trim().is_empty() {
        return PlayerDetail::empty(player_name);
    }
    let needle = player_name.to_lowercase();

    let mut stats = PlayerStats::default();
    let mut placement_sum = 0.0;
    let mut total_points = 0.0;
    let mut active_years = Vec::new();
    let mut grouped: BTreeMap<String, (f64, Vec<TournamentEntry>)> = BTreeMap::new();

    for record in records {
        let Ok(tournament) = record.validate() else {
            continue;
        };
        if !filter::included(&tournament, config) {
            continue;
        }

        let held: Vec<RankSlot> = tournament
            .placements()
            .filter(|(_, name)| name.to_lowercase() == needle)
            .map(|(slot, _)| slot)
            .collect();
        let Some(&best) = held.first() else {
            continue;
        };
        if held
            .iter()
            .any(|slot| !scoring::bucket_counts(slot.bucket(), config))
        {
            debug!(
                "Skipping {:?} for {}: placement bucket hidden",
                tournament.event_name, player_name
            );
            continue;
        }

        stats.total_tournaments += 1;
        for slot in &held {
            let bucket = slot.bucket();
            stats.total_placements += 1;
            placement_sum += bucket.placement_value();
            match bucket {
                PlacementBucket::First => stats.first_places += 1,
                PlacementBucket::Second => stats.second_places += 1,
                PlacementBucket::Top4 => stats.top4 += 1,
                PlacementBucket::Top8 => stats.top8 += 1,
            }
        }

        let bucket = best.bucket();
        let points = scoring::points_for(bucket, tournament.tier, tournament.game, config);
        total_points += points;
        active_years.push(tournament.year);

        let group = grouped.entry(tournament.game.to_string()).or_default();
        group.0 += points;
        group.1.push(TournamentEntry {
            id: tournament.id(),
            event_name: tournament.event_name.to_string(),
            game: tournament.game.to_string(),
            mode: tournament.mode.to_string(),
            tier: tournament.tier,
            year: tournament.year,
            is_lan: tournament.is_lan,
            slot: best,
            bucket,
            points,
        });
    }

    stats.grand_finals = stats.first_places + stats.second_places;
    if stats.total_placements > 0 {
        stats.average_placement = Some(placement_sum / stats.total_placements as f64);
    }
    if stats.grand_finals > 0 {
        stats.grand_final_win_rate =
            Some(stats.first_places as f64 / stats.grand_finals as f64 * 100.0);
    }

    debug!(
        "Player {} matched {} tournaments",
        player_name, stats.total_tournaments
    );

    PlayerDetail {
        player: player_name.to_string(),
        stats,
        rounded_points: scoring::round_tenth(total_points),
        year_ranges: years::summarize_unsorted(active_years),
        grouped_by_game: grouped
            .into_iter()
            .map(|(game, (points, tournaments))| {
                let group = GameGroup {
                    total_points: scoring::round_tenth(points),
                    tournaments,
                };
                (game, group)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Filters;

    fn result(game: &str, tier: u8, year: i32, slot: RankSlot, player: &str) -> TournamentRecord {
        TournamentRecord::new(game, "Duel", tier, year)
            .with_event_name(&format!("{} {}", game, year))
            .with_lan(true)
            .with_player(slot, player)
    }

    fn career() -> Vec<TournamentRecord> {
        vec![
            result("Quake 3", 1, 2001, RankSlot::First, "Fatal1ty"),
            result("Quake 3", 1, 2002, RankSlot::First, "fatal1ty"),
            result("Quake 3", 2, 2003, RankSlot::Second, "FATAL1TY"),
            result("Quake 4", 1, 2005, RankSlot::First, "Fatal1ty"),
            result("Quake 4", 3, 2006, RankSlot::Fourth, "Fatal1ty"),
            result("Quake 3", 1, 2003, RankSlot::First, "someone else"),
        ]
    }

    #[test]
    fn test_grand_final_win_rate() {
        let detail = compute_detail("fatal1ty", &career(), &ScoringConfig::default());

        assert_eq!(detail.stats.first_places, 3);
        assert_eq!(detail.stats.second_places, 1);
        assert_eq!(detail.stats.grand_finals, 4);
        assert_eq!(detail.stats.grand_final_win_rate_display(), "75.00%");
    }

    #[test]
    fn test_placement_statistics() {
        let detail = compute_detail("Fatal1ty", &career(), &ScoringConfig::default());
        let stats = &detail.stats;

        assert_eq!(stats.total_tournaments, 5);
        assert_eq!(stats.total_placements, 5);
        assert_eq!(stats.top4, 1);
        assert_eq!(stats.top8, 0);
        // (1 + 1 + 2 + 1 + 3.5) / 5
        assert_eq!(stats.average_placement, Some(1.7));
        assert_eq!(stats.average_placement_display(), "1.70");
    }

    #[test]
    fn test_points_grouped_by_game() {
        let detail = compute_detail("fatal1ty", &career(), &ScoringConfig::default());

        // Quake 3: 100 + 100 + 50 * 0.6
        let quake3 = &detail.grouped_by_game["Quake 3"];
        assert_eq!(quake3.total_points, 230.0);
        assert_eq!(quake3.tournaments.len(), 3);

        // Quake 4: 100 + 25 * 0.35
        let quake4 = &detail.grouped_by_game["Quake 4"];
        assert_eq!(quake4.total_points, 108.8);
        assert_eq!(quake4.tournaments[1].placement_label(), "Top4");
        assert_eq!(quake4.tournaments[1].slot, RankSlot::Fourth);

        assert_eq!(detail.rounded_points, 338.8);
    }

    #[test]
    fn test_year_ranges() {
        let detail = compute_detail("fatal1ty", &career(), &ScoringConfig::default());
        assert_eq!(detail.year_ranges, "2001-2003, 2005-2006");
    }

    #[test]
    fn test_hidden_bucket_excludes_tournament() {
        let mut config = ScoringConfig::default();
        config.points_visibility.second = false;
        let detail = compute_detail("fatal1ty", &career(), &config);

        assert_eq!(detail.stats.total_tournaments, 4);
        assert_eq!(detail.stats.second_places, 0);
        assert_eq!(detail.stats.grand_final_win_rate_display(), "100.00%");
        assert_eq!(detail.year_ranges, "2001-2002, 2005-2006");
    }

    #[test]
    fn test_detail_filters() {
        let config = ScoringConfig::default().with_filters(Filters {
            game: Some("Quake 4".to_string()),
            ..Filters::default()
        });
        let detail = compute_detail("fatal1ty", &career(), &config);

        assert_eq!(detail.stats.total_tournaments, 2);
        assert_eq!(detail.grouped_by_game.len(), 1);
        assert!(detail.grouped_by_game.contains_key("Quake 4"));
    }

    #[test]
    fn test_detail_hidden_tier() {
        let mut config = ScoringConfig::default();
        config.tier_visibility.insert(1, false);
        let detail = compute_detail("fatal1ty", &career(), &config);

        assert_eq!(detail.stats.total_tournaments, 2);
        assert_eq!(detail.stats.first_places, 0);
        assert_eq!(detail.year_ranges, "2003, 2006");
        // 50 * 0.6 + 25 * 0.35
        assert_eq!(detail.rounded_points, 38.8);
    }

    #[test]
    fn test_detail_lan_only() {
        let mut records = career();
        records.push(result("Quake 3", 1, 2004, RankSlot::First, "Fatal1ty").with_lan(false));

        let all = compute_detail("fatal1ty", &records, &ScoringConfig::default());
        assert_eq!(all.stats.total_tournaments, 6);

        let config = ScoringConfig::default().with_filters(Filters {
            lan_only: true,
            ..Filters::default()
        });
        let lan = compute_detail("fatal1ty", &records, &config);
        assert_eq!(lan.stats.total_tournaments, 5);
        assert_eq!(lan.year_ranges, "2001-2003, 2005-2006");
    }

    #[test]
    fn test_detail_year_range() {
        let config = ScoringConfig::default().with_filters(Filters {
            year_range: (2002, 2005),
            ..Filters::default()
        });
        let detail = compute_detail("fatal1ty", &career(), &config);

        assert_eq!(detail.stats.total_tournaments, 3);
        assert_eq!(detail.stats.first_places, 2);
        assert_eq!(detail.stats.second_places, 1);
        assert_eq!(detail.year_ranges, "2002-2003, 2005");
    }

    #[test]
    fn test_unknown_player() {
        let detail = compute_detail("nobody", &career(), &ScoringConfig::default());

        assert!(!detail.has_results());
        assert_eq!(detail.stats.average_placement_display(), "N/A");
        assert_eq!(detail.stats.grand_final_win_rate_display(), "N/A");
        assert_eq!(detail.rounded_points, 0.0);
        assert_eq!(detail.year_ranges, "");
        assert!(detail.grouped_by_game.is_empty());
    }

    #[test]
    fn test_empty_name() {
        let detail = compute_detail("  ", &career(), &ScoringConfig::default());
        assert!(!detail.has_results());
    }

    #[test]
    fn test_substring_names_do_not_match() {
        let records = vec![result("Quake Live", 1, 2015, RankSlot::First, "rapha2")];
        let detail = compute_detail("rapha", &records, &ScoringConfig::default());
        assert!(!detail.has_results());
    }

    #[test]
    fn test_multiple_slots_in_one_tournament() {
        let record = TournamentRecord::new("Quake 2", "Duel", 1, 1999)
            .with_player(RankSlot::Third, "dup")
            .with_player(RankSlot::Seventh, "Dup");
        let detail = compute_detail("dup", &[record], &ScoringConfig::default());

        assert_eq!(detail.stats.total_tournaments, 1);
        assert_eq!(detail.stats.total_placements, 2);
        let entry = &detail.grouped_by_game["Quake 2"].tournaments[0];
        assert_eq!(entry.slot, RankSlot::Third);
        assert_eq!(entry.points, 25.0);
    }
}
