use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::Utc;

use crate::analytics::{self, RangeSelector};
use crate::api::error::ApiError;
use crate::api::models::{
    HeroDetailResponse, HeroViewResponse, MapTypeViewResponse, OpponentViewResponse,
    PlayerDetailResponse, PlayerViewResponse,
};
use crate::database;

use super::{AppState, RangeParams};

/// GET /api/analytics/opponents
pub async fn opponent_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<OpponentViewResponse>, ApiError> {
    let range = RangeSelector::parse(params.range.as_deref(), false)?;
    let team_id = params.parsed_team_id()?;

    let conn = database::get_connection(&state.pool)?;
    let inputs = analytics::assemble_window(&conn, team_id, range, Utc::now().date_naive())?;

    Ok(Json(OpponentViewResponse {
        team_id,
        range: range.label(),
        view: analytics::opponent_view(&inputs),
    }))
}

/// GET /api/analytics/maps
pub async fn map_type_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<MapTypeViewResponse>, ApiError> {
    let range = RangeSelector::parse(params.range.as_deref(), false)?;
    let team_id = params.parsed_team_id()?;

    let conn = database::get_connection(&state.pool)?;
    let inputs = analytics::assemble_window(&conn, team_id, range, Utc::now().date_naive())?;

    Ok(Json(MapTypeViewResponse {
        team_id,
        range: range.label(),
        map_stats: analytics::map_type_view(&inputs),
    }))
}

/// GET /api/analytics/players
pub async fn player_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<PlayerViewResponse>, ApiError> {
    let range = RangeSelector::parse(params.range.as_deref(), true)?;
    let team_id = params.parsed_team_id()?;

    let conn = database::get_connection(&state.pool)?;
    let inputs = analytics::assemble_window(&conn, team_id, range, Utc::now().date_naive())?;

    Ok(Json(PlayerViewResponse {
        team_id,
        range: range.label(),
        players: analytics::player_view(&inputs, team_id.is_some()),
    }))
}

/// GET /api/analytics/players/:name
pub async fn player_detail(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
    Query(params): Query<RangeParams>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let range = RangeSelector::parse(params.range.as_deref(), true)?;
    let team_id = params.parsed_team_id()?;

    let conn = database::get_connection(&state.pool)?;
    let inputs = analytics::assemble_window(&conn, team_id, range, Utc::now().date_naive())?;

    let detail = analytics::player_detail(&inputs, &player)
        .ok_or_else(|| ApiError::not_found(format!("player `{player}` not found in range")))?;

    Ok(Json(PlayerDetailResponse {
        range: range.label(),
        detail,
    }))
}

/// GET /api/analytics/heroes
pub async fn hero_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<HeroViewResponse>, ApiError> {
    let range = RangeSelector::parse(params.range.as_deref(), true)?;
    let team_id = params.parsed_team_id()?;

    let conn = database::get_connection(&state.pool)?;
    let inputs = analytics::assemble_window(&conn, team_id, range, Utc::now().date_naive())?;

    Ok(Json(HeroViewResponse {
        range: range.label(),
        heroes: analytics::hero_view(&inputs, state.config.analytics.rate_window_secs),
    }))
}

/// GET /api/analytics/heroes/:name
pub async fn hero_detail(
    State(state): State<Arc<AppState>>,
    Path(hero): Path<String>,
    Query(params): Query<RangeParams>,
) -> Result<Json<HeroDetailResponse>, ApiError> {
    let range = RangeSelector::parse(params.range.as_deref(), true)?;
    let team_id = params.parsed_team_id()?;

    let conn = database::get_connection(&state.pool)?;
    let inputs = analytics::assemble_window(&conn, team_id, range, Utc::now().date_naive())?;

    let detail = analytics::hero_detail(&inputs, &hero, state.config.analytics.rate_window_secs)
        .ok_or_else(|| ApiError::not_found(format!("hero `{hero}` not found in range")))?;

    Ok(Json(HeroDetailResponse {
        range: range.label(),
        detail,
    }))
}
