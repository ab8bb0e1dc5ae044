use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::logparse::MapType;

#[derive(Debug, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub id: i64,
    pub display_name: String,
    pub team_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Scrim {
    pub id: i64,
    pub name: String,
    pub scrim_date: NaiveDate,
    pub team_id: Option<i64>,
    pub opponent_override: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct ScrimMap {
    pub id: i64,
    pub scrim_id: i64,
    pub position: i64,
    pub source_file: String,
    pub map_name: String,
    pub map_type: MapType,
    pub team1_name: String,
    pub team2_name: String,
}

#[derive(Debug, Clone)]
pub struct RosterRow {
    pub id: i64,
    pub map_id: i64,
    pub team_name: String,
    pub raw_name: String,
    pub identity_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub scrim_id: i64,
    pub performance: String,
    pub notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// One map joined with the scrim columns the analytics window needs.
#[derive(Debug, Clone)]
pub struct WindowedMap {
    pub map: ScrimMap,
    pub scrim_name: String,
    pub scrim_date: NaiveDate,
    pub team_id: Option<i64>,
    pub opponent_override: Option<String>,
}

pub(crate) fn map_type_from_sql(column: usize, value: String) -> rusqlite::Result<MapType> {
    MapType::from_str(&value).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("unknown map type `{value}`").into(),
        )
    })
}
