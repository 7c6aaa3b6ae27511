use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_param, ApiError, FilterQuery};
use crate::calculate::{
    filter_summary, rank_players, search_players, sort_ranked, RankedPlayer, SortKey, SortOrder,
};
use crate::models::ScoringConfig;

#[derive(Debug, Default, Deserialize)]
pub struct RankingsParams {
    pub game: Option<String>,
    pub mode: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub lan: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

impl RankingsParams {
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

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub players: Vec<RankedPlayer>,
    pub filtered_count: u32,
    pub total_tournaments: u32,
    pub shown_tournaments: u32,
    pub invalid_count: u32,
    pub summary: String,
    pub computed_at: DateTime<Utc>,
}

/// Rankings under the server's default scoring, with query filter overrides.
pub async fn get_rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingsParams>,
) -> Result<Json<RankingsResponse>, ApiError> {
    let filters = params.filters().apply(&state.scoring.filters)?;
    let config = state.scoring.with_filters(filters);
    respond(&state, &config, &params).await
}

/// Rankings under a caller-supplied scoring configuration.
pub async fn post_rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingsParams>,
    Json(config): Json<ScoringConfig>,
) -> Result<Json<RankingsResponse>, ApiError> {
    let filters = params.filters().apply(&config.filters)?;
    let config = config.with_filters(filters);
    respond(&state, &config, &params).await
}

async fn respond(
    state: &AppState,
    config: &ScoringConfig,
    params: &RankingsParams,
) -> Result<Json<RankingsResponse>, ApiError> {
    let sort: SortKey = parse_param(params.sort.as_deref())?;
    let order: SortOrder = parse_param(params.order.as_deref())?;

    let result = state.engine.rankings(config).await;

    let mut ranked = rank_players(result.players.clone());
    sort_ranked(&mut ranked, sort, order);
    let players: Vec<RankedPlayer> = match params.search.as_deref() {
        Some(query) if !query.trim().is_empty() => {
            search_players(&ranked, query.trim()).into_iter().cloned().collect()
        }
        _ => ranked,
    };

    Ok(Json(RankingsResponse {
        summary: filter_summary(players.len(), &result),
        players,
        filtered_count: result.filtered_count,
        total_tournaments: result.total_count,
        shown_tournaments: result.shown_count(),
        invalid_count: result.invalid_count,
        computed_at: result.computed_at,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::engine::RankingEngine;
    use crate::models::{RankSlot, ScoringConfig, TournamentRecord};
    use crate::source::MemorySource;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn records() -> Vec<TournamentRecord> {
        vec![
            TournamentRecord::new("Quake 3", "Duel", 1, 2001)
                .with_lan(true)
                .with_event_name("CPL Winter 2001")
                .with_player(RankSlot::First, "ZeRo4")
                .with_player(RankSlot::Second, "LeXeR"),
            TournamentRecord::new("Quake 3", "TDM", 2, 2002)
                .with_event_name("Clanbase Cup")
                .with_player(RankSlot::First, "LeXeR"),
            TournamentRecord::new("Quake Live", "Duel", 1, 2012)
                .with_lan(true)
                .with_event_name("DreamHack Winter 2012")
                .with_player(RankSlot::First, "Cypher")
                .with_player(RankSlot::Second, "ZeRo4"),
            TournamentRecord::new("", "Duel", 1, 2012),
        ]
    }

    fn setup_test_state(source: MemorySource) -> AppState {
        AppState::new(
            RankingEngine::new(Arc::new(source)),
            ScoringConfig::default(),
        )
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post_json(app: axum::Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_rankings_default() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let (status, json) = get_json(app, "/api/rankings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_tournaments"], 4);
        assert_eq!(json["invalid_count"], 1);
        assert_eq!(json["shown_tournaments"], 3);

        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 3);
        // ZeRo4 100 + 50, LeXeR 50 + 60, Cypher 100
        assert_eq!(players[0]["player"], "ZeRo4");
        assert_eq!(players[0]["points"], 150);
        assert_eq!(players[0]["rank"], 1);
        assert_eq!(players[1]["player"], "LeXeR");
        assert_eq!(players[1]["points"], 110);
        assert_eq!(players[2]["rank"], 3);
    }

    #[tokio::test]
    async fn test_rankings_sorted_by_player() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let (_, json) = get_json(app, "/api/rankings?sort=player&order=asc").await;

        let players = json["players"].as_array().unwrap();
        let names: Vec<&str> = players.iter().map(|p| p["player"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Cypher", "LeXeR", "ZeRo4"]);
        assert_eq!(players[0]["rank"], 3);
    }

    #[tokio::test]
    async fn test_rankings_game_filter() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let (status, json) = get_json(app, "/api/rankings?game=Quake%20Live&lan=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["filtered_count"], 2);
        assert_eq!(json["players"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["summary"],
            "Showing 2 players in 1 tournaments (2 tournaments filtered out of 4)"
        );
    }

    #[tokio::test]
    async fn test_rankings_search() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let (_, json) = get_json(app, "/api/rankings?search=zero").await;

        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0]["player"], "ZeRo4");
        assert_eq!(players[0]["rank"], 1);
    }

    #[tokio::test]
    async fn test_rankings_bad_sort() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let (status, json) = get_json(app, "/api/rankings?sort=elo").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_rankings_bad_year() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let (status, json) = get_json(app, "/api/rankings?from=late90s").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_rankings_source_down() {
        let app = build_router(setup_test_state(MemorySource::unavailable()));
        let (status, json) = get_json(app, "/api/rankings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["players"], json!([]));
        assert_eq!(json["filtered_count"], 0);
        assert_eq!(json["total_tournaments"], 0);
    }

    #[tokio::test]
    async fn test_post_rankings_with_config() {
        let app = build_router(setup_test_state(MemorySource::new(records())));
        let payload = json!({
            "points": { "first": 10.0, "second": 5.0, "top4": 0.0, "top8": 0.0 },
            "tier_weights": { "1": 100.0, "2": 100.0 },
            "game_visibility": { "Quake Live": false }
        });
        let (status, json) = post_json(app, "/api/rankings?sort=player&order=asc", payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["filtered_count"], 1);
        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["player"], "LeXeR");
        assert_eq!(players[0]["points"], 15);
        assert_eq!(players[1]["player"], "ZeRo4");
        assert_eq!(players[1]["points"], 10);
    }
}
