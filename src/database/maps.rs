use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, types::Value, Connection};

use crate::logparse::event::MatchStart;

use super::models::{map_type_from_sql, ScrimMap, WindowedMap};

pub fn insert_map(
    conn: &Connection,
    scrim_id: i64,
    position: i64,
    source_file: &str,
    start: &MatchStart,
) -> Result<ScrimMap> {
    let sql = "INSERT INTO maps (scrim_id, position, source_file, map_name, map_type, team1_name, team2_name) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id, scrim_id, position, source_file, map_name, map_type, team1_name, team2_name";

    conn.query_row(
        sql,
        params![
            scrim_id,
            position,
            source_file,
            start.map_name,
            start.map_type.as_str(),
            start.team1_name,
            start.team2_name,
        ],
        parse_map_row,
    )
    .context("Failed to insert map")
}

fn parse_map_row(row: &rusqlite::Row) -> rusqlite::Result<ScrimMap> {
    Ok(ScrimMap {
        id: row.get(0)?,
        scrim_id: row.get(1)?,
        position: row.get(2)?,
        source_file: row.get(3)?,
        map_name: row.get(4)?,
        map_type: map_type_from_sql(5, row.get(5)?)?,
        team1_name: row.get(6)?,
        team2_name: row.get(7)?,
    })
}

pub fn list_for_scrim(conn: &Connection, scrim_id: i64) -> Result<Vec<ScrimMap>> {
    let sql = "SELECT id, scrim_id, position, source_file, map_name, map_type, team1_name, team2_name FROM maps WHERE scrim_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![scrim_id], parse_map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Maps joined with their scrims, newest activity first. `limit` bounds the
/// scan at map granularity (a three-map scrim contributes three rows), which
/// is what the `last-N-maps` range selectors count.
pub fn list_window(
    conn: &Connection,
    team_id: Option<i64>,
    since: Option<NaiveDate>,
    limit: Option<u32>,
) -> Result<Vec<WindowedMap>> {
    let mut sql = String::from(
        "
        SELECT m.id, m.scrim_id, m.position, m.source_file, m.map_name, m.map_type,
               m.team1_name, m.team2_name,
               s.name, s.scrim_date, s.team_id, s.opponent_override
        FROM maps m
        JOIN scrims s ON s.id = m.scrim_id
        ",
    );
    let mut conditions: Vec<&str> = Vec::new();
    let mut bound: Vec<Value> = Vec::new();

    if let Some(team_id) = team_id {
        bound.push(Value::Integer(team_id));
        conditions.push("s.team_id = ?");
    }
    if let Some(since) = since {
        bound.push(Value::Text(since.to_string()));
        conditions.push("s.scrim_date >= ?");
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY s.scrim_date DESC, s.id DESC, m.position DESC");
    if let Some(limit) = limit {
        bound.push(Value::Integer(limit as i64));
        sql.push_str(" LIMIT ?");
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(bound), |row| {
            Ok(WindowedMap {
                map: parse_map_row(row)?,
                scrim_name: row.get(8)?,
                scrim_date: row.get(9)?,
                team_id: row.get(10)?,
                opponent_override: row.get(11)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
