//! Fetch-then-compute orchestration.
//!
//! `RankingEngine` pulls the full tournament table from its record source and
//! hands it to the pure computations in [`crate::calculate`]. A failed query
//! is logged and degrades to an empty result rather than an error.
//!
//! `Session` sits on top for a single interactive view: each request takes a
//! generation ticket and a result that finishes after a newer request started
//! is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::calculate::{compute_detail, compute_rankings};
use crate::models::{PlayerDetail, RankingResult, ScoringConfig, TournamentRecord};
use crate::source::{RecordSource, SourceError};

/// Computes rankings over a record source.
pub struct RankingEngine {
    source: Arc<dyn RecordSource>,
}

impl RankingEngine {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    async fn fetch(&self) -> Result<Vec<TournamentRecord>, SourceError> {
        let records = self.source.fetch_all().await?;
        debug!(
            "Fetched {} records from {} source",
            records.len(),
            self.source.name()
        );
        Ok(records)
    }

    /// Aggregate ranking for `config`.
    pub async fn rankings(&self, config: &ScoringConfig) -> RankingResult {
        match self.fetch().await {
            Ok(records) => compute_rankings(&records, config),
            Err(e) => {
                error!("Failed to fetch tournaments: {}", e);
                RankingResult::empty()
            }
        }
    }

    /// A single player's page for `config`.
    pub async fn player_detail(&self, player_name: &str, config: &ScoringConfig) -> PlayerDetail {
        match self.fetch().await {
            Ok(records) => compute_detail(player_name, &records, config),
            Err(e) => {
                error!("Failed to fetch tournaments for {}: {}", player_name, e);
                PlayerDetail::empty(player_name)
            }
        }
    }

    /// Unfiltered size of the tournament table.
    pub async fn total_tournaments(&self) -> usize {
        match self.source.count().await {
            Ok(count) => count,
            Err(e) => {
                error!("Failed to count tournaments: {}", e);
                0
            }
        }
    }

    /// Start a view session over this engine.
    pub fn session(self: &Arc<Self>) -> Session {
        Session {
            engine: Arc::clone(self),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// One interactive view. Only the most recently requested result is delivered.
#[derive(Clone)]
pub struct Session {
    engine: Arc<RankingEngine>,
    generation: Arc<AtomicU64>,
}

impl Session {
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Rankings for `config`, or `None` if a newer request superseded this one.
    pub async fn rankings(&self, config: &ScoringConfig) -> Option<RankingResult> {
        let ticket = self.begin();
        let result = self.engine.rankings(config).await;
        if self.is_current(ticket) {
            info!("Delivering rankings for request {}", ticket);
            Some(result)
        } else {
            debug!("Discarding superseded rankings for request {}", ticket);
            None
        }
    }

    /// Player detail for `config`, or `None` if superseded.
    pub async fn player_detail(
        &self,
        player_name: &str,
        config: &ScoringConfig,
    ) -> Option<PlayerDetail> {
        let ticket = self.begin();
        let detail = self.engine.player_detail(player_name, config).await;
        if self.is_current(ticket) {
            Some(detail)
        } else {
            debug!(
                "Discarding superseded detail for {} (request {})",
                player_name, ticket
            );
            None
        }
    }
}
