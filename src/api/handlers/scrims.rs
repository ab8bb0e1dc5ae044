use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;

use crate::api::error::ApiError;
use crate::api::models::{
    MapDetailResponse, OutcomeResponse, PreviewMapResponse, PreviewResponse,
    RosterEntryResponse, ScrimDetailResponse, ScrimListItem, ScrimListResponse, UploadResponse,
    UploadedMap,
};
use crate::database;
use crate::errors::IngestError;
use crate::identity::IdentityMapping;
use crate::logparse::event::EventsByKind;
use crate::outcome::{self, SideContext};
use crate::services::ingestion::{IngestionService, ScrimMetadata, UploadFile};

use super::AppState;

/// Collected multipart form: repeated `file` parts plus the scrim metadata
/// fields.
#[derive(Default)]
struct UploadForm {
    files: Vec<UploadFile>,
    name: Option<String>,
    date: Option<String>,
    team_id: Option<String>,
    opponent: Option<String>,
    identity_map: Option<String>,
}

async fn read_upload_form(mut form: Multipart) -> Result<UploadForm, ApiError> {
    let mut collected = UploadForm::default();

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request("malformed_multipart", e.to_string()))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ApiError::bad_request("missing_filename", "file part has no filename")
                    })?;
                let contents = field.text().await.map_err(|e| {
                    ApiError::bad_request("unreadable_file", format!("file {file_name}: {e}"))
                })?;
                collected.files.push(UploadFile {
                    file_name,
                    contents,
                });
            }
            other => {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request("malformed_multipart", format!("field {other}: {e}"))
                })?;
                match other {
                    "name" => collected.name = Some(value),
                    "date" => collected.date = Some(value),
                    "teamId" => collected.team_id = Some(value),
                    "opponent" => collected.opponent = Some(value),
                    "identityMap" => collected.identity_map = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(collected)
}

fn parse_metadata(form: &UploadForm) -> Result<ScrimMetadata, ApiError> {
    let name = form
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("missing_name", "scrim name is required"))?;

    let raw_date = form
        .date
        .clone()
        .ok_or_else(|| ApiError::bad_request("missing_date", "scrim date is required"))?;
    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .map_err(|_| ApiError::from(IngestError::InvalidDate { value: raw_date }))?;

    let team_id = form
        .team_id
        .as_deref()
        .map(|value| {
            value.parse::<i64>().map_err(|_| {
                ApiError::bad_request("invalid_team_id", format!("invalid team id `{value}`"))
            })
        })
        .transpose()?;

    let identity_mapping: IdentityMapping = match form.identity_map.as_deref() {
        Some(raw) => serde_json::from_str(raw).map_err(|e| {
            ApiError::bad_request("invalid_identity_map", format!("identityMap: {e}"))
        })?,
        None => HashMap::new(),
    };

    Ok(ScrimMetadata {
        name,
        date,
        team_id,
        opponent_override: form.opponent.clone().filter(|o| !o.trim().is_empty()),
        identity_mapping,
    })
}

/// POST /api/scrims — all-or-nothing batch upload.
pub async fn upload_scrim(
    State(state): State<Arc<AppState>>,
    form: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = read_upload_form(form).await?;
    let meta = parse_metadata(&form)?;

    let service = IngestionService::new(state.pool.clone(), state.config.clone());
    let ingested = service.ingest(&form.files, &meta)?;

    Ok(Json(UploadResponse {
        scrim_id: ingested.scrim.id,
        name: ingested.scrim.name,
        date: ingested.scrim.scrim_date,
        maps: ingested
            .maps
            .into_iter()
            .map(|map| UploadedMap {
                id: map.id,
                map_name: map.map_name,
                map_type: map.map_type.as_str().to_string(),
                source_file: map.source_file,
            })
            .collect(),
    }))
}

/// POST /api/scrims/preview — parse and validate without persisting.
pub async fn preview_upload(
    State(state): State<Arc<AppState>>,
    form: Multipart,
) -> Result<Json<PreviewResponse>, ApiError> {
    let form = read_upload_form(form).await?;

    let service = IngestionService::new(state.pool.clone(), state.config.clone());
    let preview = service.preview(&form.files)?;

    Ok(Json(PreviewResponse {
        maps: preview
            .maps
            .into_iter()
            .map(|map| PreviewMapResponse {
                file_name: map.file_name,
                map_name: map.map_name,
                map_type: map.map_type,
                team1_name: map.team1_name,
                team2_name: map.team2_name,
            })
            .collect(),
        players_by_team: preview.players_by_team,
    }))
}

/// GET /api/scrims — recent scrims with map counts.
pub async fn list_scrims(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScrimListResponse>, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    let rows = database::scrims::list_recent(&conn, state.config.analytics.scrim_list_limit)?;

    Ok(Json(ScrimListResponse {
        scrims: rows
            .into_iter()
            .map(|(scrim, map_count)| ScrimListItem {
                id: scrim.id,
                name: scrim.name,
                date: scrim.scrim_date,
                team_id: scrim.team_id,
                opponent: scrim.opponent_override,
                map_count,
            })
            .collect(),
    }))
}

/// GET /api/scrims/:id — scrim with per-map read-time outcomes.
pub async fn scrim_detail(
    State(state): State<Arc<AppState>>,
    Path(scrim_id): Path<i64>,
) -> Result<Json<ScrimDetailResponse>, ApiError> {
    let conn = database::get_connection(&state.pool)?;

    let scrim = database::scrims::find_by_id(&conn, scrim_id)?
        .ok_or_else(|| ApiError::not_found(format!("scrim {scrim_id} not found")))?;

    let our_team_name = match scrim.team_id {
        Some(team_id) => database::teams::find_by_id(&conn, team_id)?.map(|team| team.name),
        None => None,
    };
    let identity_names: HashMap<i64, String> = database::identities::list_all(&conn)?
        .into_iter()
        .map(|identity| (identity.id, identity.display_name))
        .collect();

    let mut maps = Vec::new();
    for map in database::maps::list_for_scrim(&conn, scrim_id)? {
        let events = database::events::load_for_map(&conn, map.id)?;
        let by_kind = EventsByKind::from_events(&events);
        let outcome = outcome::reconcile(
            &by_kind,
            map.map_type,
            SideContext {
                our_team_name: our_team_name.as_deref(),
                opponent_override: scrim.opponent_override.as_deref(),
            },
        );

        let roster = database::rosters::list_for_map(&conn, map.id)?
            .into_iter()
            .map(|entry| RosterEntryResponse {
                resolved_name: entry
                    .identity_id
                    .and_then(|id| identity_names.get(&id).cloned()),
                team_name: entry.team_name,
                raw_name: entry.raw_name,
                identity_id: entry.identity_id,
            })
            .collect();

        maps.push(MapDetailResponse {
            id: map.id,
            position: map.position,
            map_name: map.map_name,
            map_type: map.map_type.as_str().to_string(),
            team1_name: map.team1_name,
            team2_name: map.team2_name,
            source_file: map.source_file,
            outcome: OutcomeResponse::from(outcome),
            roster,
        });
    }

    Ok(Json(ScrimDetailResponse {
        id: scrim.id,
        name: scrim.name,
        date: scrim.scrim_date,
        team_id: scrim.team_id,
        opponent: scrim.opponent_override,
        maps,
    }))
}

/// DELETE /api/scrims/:id — cascades to maps, events and rosters.
pub async fn delete_scrim(
    State(state): State<Arc<AppState>>,
    Path(scrim_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = database::get_connection(&state.pool)?;

    if database::scrims::delete_scrim(&conn, scrim_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("scrim {scrim_id} not found")))
    }
}
