use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_param, ApiError, FilterQuery};
use crate::calculate::{sort_tournaments, SortOrder, TournamentSortKey};
use crate::models::{GameGroup, PlayerDetail, PlayerStats, ScoringConfig};

#[derive(Debug, Default, Deserialize)]
pub struct PlayerParams {
    pub game: Option<String>,
    pub mode: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub lan: Option<String>,
    /// Orders tournaments within each game
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl PlayerParams {
    fn filters(&self) -> FilterQuery<'_> {
        FilterQuery {
            game: self.game.as_deref(),
            mode: self.mode.as_deref(),
            from: self.from.as_deref(),
            to: self.to.as_deref(),
            lan: self.lan.as_deref(),
        }
    }
}

/// Stats with presentation strings for the rate fields.
#[derive(Debug, Serialize)]
pub struct StatsView {
    pub total_tournaments: u32,
    pub first_places: u32,
    pub second_places: u32,
    pub top4: u32,
    pub top8: u32,
    pub total_placements: u32,
    pub grand_finals: u32,
    pub average_placement: String,
    pub grand_final_win_rate: String,
}

impl From<&PlayerStats> for StatsView {
    fn from(stats: &PlayerStats) -> Self {
        Self {
            total_tournaments: stats.total_tournaments,
            first_places: stats.first_places,
            second_places: stats.second_places,
            top4: stats.top4,
            top8: stats.top8,
            total_placements: stats.total_placements,
            grand_finals: stats.grand_finals,
            average_placement: stats.average_placement_display(),
            grand_final_win_rate: stats.grand_final_win_rate_display(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub player: String,
    pub rounded_points: f64,
    pub year_ranges: String,
    pub stats: StatsView,
    pub grouped_tournaments: BTreeMap<String, GameGroup>,
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let filters = params.filters().apply(&state.scoring.filters)?;
    let config = state.scoring.with_filters(filters);
    respond(&state, &name, &config, &params).await
}

pub async fn post_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PlayerParams>,
    Json(config): Json<ScoringConfig>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let filters = params.filters().apply(&config.filters)?;
    let config = config.with_filters(filters);
    respond(&state, &name, &config, &params).await
}

async fn respond(
    state: &AppState,
    name: &str,
    config: &ScoringConfig,
    params: &PlayerParams,
) -> Result<Json<PlayerResponse>, ApiError> {
    let sort = params
        .sort
        .as_deref()
        .map(str::parse::<TournamentSortKey>)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let order: SortOrder = parse_param(params.order.as_deref())?;

    let PlayerDetail {
        player,
        stats,
        rounded_points,
        year_ranges,
        mut grouped_by_game,
    } = state.engine.player_detail(name, config).await;

    if let Some(key) = sort {
        for group in grouped_by_game.values_mut() {
            sort_tournaments(&mut group.tournaments, key, order);
        }
    }

    Ok(Json(PlayerResponse {
        player,
        rounded_points,
        year_ranges,
        stats: StatsView::from(&stats),
        grouped_tournaments: grouped_by_game,
    }))
}
