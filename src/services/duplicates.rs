use anyhow::Result;
use log::info;

use crate::config::AppConfig;
use crate::database::{self, DbPool};
use crate::identity::{self, DuplicateCandidate};

/// Offline scan of the identity catalog for likely duplicates. Quadratic in
/// catalog size, so it runs as its own command, never inside an upload.
pub struct DuplicateScanService {
    pool: DbPool,
    config: AppConfig,
}

impl DuplicateScanService {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    pub fn run(&self, threshold_override: Option<f64>) -> Result<Vec<DuplicateCandidate>> {
        let threshold = threshold_override.unwrap_or(self.config.identity.similarity_threshold);

        let conn = database::get_connection(&self.pool)?;
        let catalog: Vec<(i64, String)> = database::identities::list_all(&conn)?
            .into_iter()
            .map(|identity| (identity.id, identity.display_name))
            .collect();

        info!(
            "Scanning {} identities for duplicates (threshold {:.2})",
            catalog.len(),
            threshold
        );

        let candidates = identity::find_duplicate_candidates(&catalog, threshold);
        info!("Found {} duplicate candidate pairs", candidates.len());

        Ok(candidates)
    }
}
