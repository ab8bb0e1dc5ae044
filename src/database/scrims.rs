use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Scrim;

pub fn insert_scrim(
    conn: &Connection,
    name: &str,
    scrim_date: NaiveDate,
    team_id: Option<i64>,
    opponent_override: Option<&str>,
) -> Result<Scrim> {
    let sql = "INSERT INTO scrims (name, scrim_date, team_id, opponent_override) VALUES (?1, ?2, ?3, ?4) RETURNING id, name, scrim_date, team_id, opponent_override, created_at";

    conn.query_row(
        sql,
        params![name, scrim_date, team_id, opponent_override],
        parse_scrim_row,
    )
    .context("Failed to insert scrim")
}

fn parse_scrim_row(row: &rusqlite::Row) -> rusqlite::Result<Scrim> {
    Ok(Scrim {
        id: row.get(0)?,
        name: row.get(1)?,
        scrim_date: row.get(2)?,
        team_id: row.get(3)?,
        opponent_override: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Scrim>> {
    let sql = "SELECT id, name, scrim_date, team_id, opponent_override, created_at FROM scrims WHERE id = ?1";

    conn.query_row(sql, params![id], parse_scrim_row)
        .optional()
        .context("Failed to query scrim by id")
}

/// Recent scrims with their map counts, newest first.
pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<(Scrim, i64)>> {
    let sql = "
        SELECT s.id, s.name, s.scrim_date, s.team_id, s.opponent_override, s.created_at,
               COUNT(m.id) AS map_count
        FROM scrims s
        LEFT JOIN maps m ON m.scrim_id = s.id
        GROUP BY s.id
        ORDER BY s.scrim_date DESC, s.id DESC
        LIMIT ?1
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok((parse_scrim_row(row)?, row.get::<_, i64>(6)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Deletes a scrim; maps, events and rosters cascade. Returns whether a row
/// existed.
pub fn delete_scrim(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn
        .execute("DELETE FROM scrims WHERE id = ?1", params![id])
        .context("Failed to delete scrim")?;
    Ok(affected > 0)
}
