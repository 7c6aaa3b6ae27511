use std::sync::Arc;

use crate::engine::RankingEngine;
use crate::models::ScoringConfig;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RankingEngine>,
    /// Scoring used by GET requests
    pub scoring: Arc<ScoringConfig>,
}

impl AppState {
    pub fn new(engine: RankingEngine, scoring: ScoringConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            scoring: Arc::new(scoring),
        }
    }
}
