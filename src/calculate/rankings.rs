//! Aggregate ranking computation.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{
    PlacementBucket, PlacementCounts, PlayerAggregate, RankingResult, ScoringConfig, Tournament,
    TournamentRecord,
};

use super::{filter, scoring};

/// Running totals for one player. Points stay unrounded until emission.
#[derive(Debug)]
struct Accumulator<'a> {
    player: &'a str,
    points: f64,
    placements: PlacementCounts,
    games: Vec<&'a str>,
    modes: Vec<&'a str>,
    participations: u32,
}

impl<'a> Accumulator<'a> {
    fn new(player: &'a str) -> Self {
        Self {
            player,
            points: 0.0,
            placements: PlacementCounts::default(),
            games: Vec::new(),
            modes: Vec::new(),
            participations: 0,
        }
    }

    fn add(&mut self, bucket: PlacementBucket, points: f64, tournament: &Tournament<'a>) {
        self.points += points;
        self.placements.increment(bucket);
        self.participations += 1;
        if !self.games.contains(&tournament.game) {
            self.games.push(tournament.game);
        }
        if !self.modes.contains(&tournament.mode) {
            self.modes.push(tournament.mode);
        }
    }

    fn finish(self) -> PlayerAggregate {
        PlayerAggregate {
            player: self.player.to_string(),
            points: scoring::round_whole(self.points),
            placements: self.placements,
            games: self.games.into_iter().map(str::to_string).collect(),
            modes: self.modes.into_iter().map(str::to_string).collect(),
            participations: self.participations,
        }
    }
}

/// Compute per-player aggregates over every record that passes the filters.
///
/// Players are keyed by their exact stored name. The returned players are in
/// order of first appearance; callers that need a ranking sort them.
pub fn compute_rankings(records: &[TournamentRecord], config: &ScoringConfig) -> RankingResult {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut players: Vec<Accumulator<'_>> = Vec::new();
    let mut filtered_count = 0u32;
    let mut invalid_count = 0u32;

    for record in records {
        let tournament = match record.validate() {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping invalid tournament: {}", e);
                invalid_count += 1;
                continue;
            }
        };

        if let Err(reason) = filter::check(&tournament, config) {
            debug!("Filtered {:?} ({})", tournament.event_name, reason);
            filtered_count += 1;
            continue;
        }

        for bucket in PlacementBucket::ALL {
            if !scoring::bucket_counts(bucket, config) {
                continue;
            }
            let points = scoring::points_for(bucket, tournament.tier, tournament.game, config);

            for slot in bucket.slots() {
                let Some(player) = tournament.player_at(*slot) else {
                    continue;
                };
                let i = *index.entry(player).or_insert_with(|| {
                    players.push(Accumulator::new(player));
                    players.len() - 1
                });
                players[i].add(bucket, points, &tournament);
            }
        }
    }

    info!(
        "Ranked {} players from {} tournaments ({} filtered, {} invalid)",
        players.len(),
        records.len(),
        filtered_count,
        invalid_count
    );

    RankingResult {
        players: players.into_iter().map(Accumulator::finish).collect(),
        filtered_count,
        total_count: records.len() as u32,
        invalid_count,
        computed_at: Utc::now(),
    }
}
