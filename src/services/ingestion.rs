use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::config::AppConfig;
use crate::database::{self, DbPool, Scrim, ScrimMap};
use crate::errors::IngestError;
use crate::identity::{self, IdentityMapping};
use crate::logparse::{self, ParsedLog};

/// One uploaded log file, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub contents: String,
}

/// Operator-supplied metadata accompanying an upload batch.
#[derive(Debug, Clone)]
pub struct ScrimMetadata {
    pub name: String,
    pub date: NaiveDate,
    pub team_id: Option<i64>,
    pub opponent_override: Option<String>,
    pub identity_mapping: IdentityMapping,
}

/// Per-file map summary returned by the preview step.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSummary {
    pub file_name: String,
    pub map_name: String,
    pub map_type: String,
    pub team1_name: String,
    pub team2_name: String,
}

/// Preview output: what the batch would create, plus every distinct raw
/// player name grouped by team so the caller can build the mapping UI.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResult {
    pub maps: Vec<MapSummary>,
    pub players_by_team: BTreeMap<String, Vec<String>>,
}

#[derive(Debug)]
pub struct IngestedScrim {
    pub scrim: Scrim,
    pub maps: Vec<ScrimMap>,
}

/// Synchronous batch ingestion: screen → validate → parse → resolve →
/// persist. Every file must pass before anything is written; the write is a
/// single transaction, so a half-ingested scrim can never exist.
pub struct IngestionService {
    pool: DbPool,
    config: AppConfig,
}

impl IngestionService {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    /// Parses and validates without persisting anything.
    pub fn preview(&self, files: &[UploadFile]) -> Result<PreviewResult> {
        let parsed = self.screen_and_parse(files)?;

        let mut maps = Vec::with_capacity(parsed.len());
        let mut players_by_team: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (file_name, log) in &parsed {
            let start = log.match_start();
            maps.push(MapSummary {
                file_name: file_name.clone(),
                map_name: start.map_name.clone(),
                map_type: start.map_type.as_str().to_string(),
                team1_name: start.team1_name.clone(),
                team2_name: start.team2_name.clone(),
            });
            for pair in &log.roster {
                players_by_team
                    .entry(pair.team_name.clone())
                    .or_default()
                    .insert(pair.player_name.clone());
            }
        }

        Ok(PreviewResult {
            maps,
            players_by_team: players_by_team
                .into_iter()
                .map(|(team, players)| (team, players.into_iter().collect()))
                .collect(),
        })
    }

    /// Ingests a whole batch or nothing. Typed `IngestError`s surface via
    /// anyhow downcast so the API layer can map them to client errors.
    pub fn ingest(&self, files: &[UploadFile], meta: &ScrimMetadata) -> Result<IngestedScrim> {
        let parsed = self.screen_and_parse(files)?;

        let mut conn = database::get_connection(&self.pool)?;

        if let Some(team_id) = meta.team_id {
            if database::teams::find_by_id(&conn, team_id)?.is_none() {
                return Err(IngestError::UnknownTeam { team_id }.into());
            }
        }
        self.check_identity_mapping(&conn, &meta.identity_mapping)?;

        let tx = conn
            .transaction()
            .context("Failed to open ingestion transaction")?;

        let scrim = database::scrims::insert_scrim(
            &tx,
            &meta.name,
            meta.date,
            meta.team_id,
            meta.opponent_override.as_deref(),
        )?;

        let mut maps = Vec::with_capacity(parsed.len());
        for (position, (file_name, log)) in parsed.iter().enumerate() {
            let map = database::maps::insert_map(
                &tx,
                scrim.id,
                (position + 1) as i64,
                file_name,
                log.match_start(),
            )?;
            database::events::insert_map_events(&tx, map.id, &log.events)?;

            let roster = identity::resolve(&meta.identity_mapping, &log.roster);
            database::rosters::insert_map_roster(&tx, map.id, &roster)?;
            maps.push(map);
        }

        tx.commit().context("Failed to commit ingestion batch")?;

        info!(
            "Ingested scrim '{}' ({} maps, {} files)",
            scrim.name,
            maps.len(),
            files.len()
        );

        Ok(IngestedScrim { scrim, maps })
    }

    /// Screens extensions, validates signatures, then parses, in that order
    /// and strictly before any persistence. The first failing file aborts
    /// the batch and is named in the error.
    fn screen_and_parse(&self, files: &[UploadFile]) -> Result<Vec<(String, ParsedLog)>> {
        if files.is_empty() {
            return Err(IngestError::EmptyBatch.into());
        }
        let limit = self.config.ingest.max_files_per_batch;
        if files.len() > limit {
            return Err(IngestError::TooManyFiles {
                got: files.len(),
                limit,
            }
            .into());
        }

        for file in files {
            logparse::validate_extension(&file.file_name).map_err(|source| {
                IngestError::Validation {
                    file: file.file_name.clone(),
                    source,
                }
            })?;
        }
        for file in files {
            logparse::validate(&file.contents).map_err(|source| IngestError::Validation {
                file: file.file_name.clone(),
                source,
            })?;
        }

        files
            .iter()
            .map(|file| {
                let log =
                    logparse::parse(&file.contents).map_err(|source| IngestError::Parse {
                        file: file.file_name.clone(),
                        source,
                    })?;
                Ok((file.file_name.clone(), log))
            })
            .collect()
    }

    fn check_identity_mapping(
        &self,
        conn: &rusqlite::Connection,
        mapping: &IdentityMapping,
    ) -> Result<()> {
        for (raw_name, identity_id) in mapping {
            if database::identities::find_by_id(conn, *identity_id)?.is_none() {
                return Err(IngestError::UnknownIdentity {
                    raw_name: raw_name.clone(),
                    identity_id: *identity_id,
                }
                .into());
            }
        }
        Ok(())
    }
}
