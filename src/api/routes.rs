use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    analytics::{
        hero_detail, hero_stats, map_type_stats, opponent_stats, player_detail, player_stats,
    },
    scrims::{delete_scrim, list_scrims, preview_upload, scrim_detail, upload_scrim},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.ingest.max_upload_bytes;

    Router::new()
        .route("/api/scrims", get(list_scrims).post(upload_scrim))
        .route("/api/scrims/preview", post(preview_upload))
        .route("/api/scrims/:id", get(scrim_detail).delete(delete_scrim))
        .route("/api/analytics/opponents", get(opponent_stats))
        .route("/api/analytics/maps", get(map_type_stats))
        .route("/api/analytics/players", get(player_stats))
        .route("/api/analytics/players/:name", get(player_detail))
        .route("/api/analytics/heroes", get(hero_stats))
        .route("/api/analytics/heroes/:name", get(hero_detail))
        .layer(axum::extract::DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
