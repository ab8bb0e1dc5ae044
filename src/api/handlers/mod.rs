use serde::Deserialize;

use crate::config::AppConfig;
use crate::database::DbPool;
use crate::errors::AnalyticsError;

pub mod analytics;
pub mod scrims;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub range: Option<String>,
    pub team_id: Option<String>,
}

impl RangeParams {
    /// The team scope, parsed here rather than by the extractor so a bad
    /// value surfaces as the typed analytics error.
    pub fn parsed_team_id(&self) -> Result<Option<i64>, AnalyticsError> {
        self.team_id
            .as_deref()
            .map(|value| {
                value.parse::<i64>().map_err(|_| AnalyticsError::InvalidTeamId {
                    value: value.to_string(),
                })
            })
            .transpose()
    }
}
