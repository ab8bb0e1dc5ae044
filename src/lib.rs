pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod logparse;
pub mod outcome;
pub mod services;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::database::DbPool;
use crate::services::duplicates::DuplicateScanService;
use crate::services::ingestion::{IngestionService, ScrimMetadata, UploadFile};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_import(
    files: &[PathBuf],
    name: &str,
    date: &str,
    team_id: Option<i64>,
    opponent: Option<String>,
) -> Result<()> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid scrim date `{date}` (expected YYYY-MM-DD)"))?;

    let mut upload = Vec::with_capacity(files.len());
    for path in files {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        upload.push(UploadFile {
            file_name,
            contents,
        });
    }

    let config = AppConfig::new();
    let service = IngestionService::new(open_database()?, config);
    let ingested = service.ingest(
        &upload,
        &ScrimMetadata {
            name: name.to_string(),
            date,
            team_id,
            opponent_override: opponent,
            identity_mapping: Default::default(),
        },
    )?;

    println!(
        "Created scrim {} '{}' with {} maps:",
        ingested.scrim.id,
        ingested.scrim.name,
        ingested.maps.len()
    );
    for map in ingested.maps {
        println!(
            "  #{} {} ({}) — {} vs {}",
            map.position, map.map_name, map.map_type.as_str(), map.team1_name, map.team2_name
        );
    }
    Ok(())
}

pub fn handle_find_duplicates(threshold: Option<f64>) -> Result<()> {
    let config = AppConfig::new();
    let service = DuplicateScanService::new(open_database()?, config);
    let candidates = service.run(threshold)?;

    if candidates.is_empty() {
        println!("No duplicate candidates found");
        return Ok(());
    }
    for candidate in candidates {
        println!(
            "{:.3}  [{}] {}  <->  [{}] {}",
            candidate.similarity,
            candidate.first_id,
            candidate.first_name,
            candidate.second_id,
            candidate.second_name
        );
    }
    Ok(())
}

fn open_database() -> Result<DbPool> {
    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "scrimlog.db".to_string());
    let pool = database::create_pool(&db_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::initialize_database(&mut conn)?;
    Ok(pool)
}
