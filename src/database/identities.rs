use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::PlayerIdentity;

pub fn create_identity(
    conn: &Connection,
    display_name: &str,
    team_id: Option<i64>,
) -> Result<PlayerIdentity> {
    let sql = "INSERT INTO player_identities (display_name, team_id) VALUES (?1, ?2) RETURNING id, display_name, team_id, created_at";

    conn.query_row(sql, params![display_name, team_id], parse_identity_row)
        .context("Failed to insert player identity")
}

fn parse_identity_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerIdentity> {
    Ok(PlayerIdentity {
        id: row.get(0)?,
        display_name: row.get(1)?,
        team_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<PlayerIdentity>> {
    let sql =
        "SELECT id, display_name, team_id, created_at FROM player_identities WHERE id = ?1";

    conn.query_row(sql, params![id], parse_identity_row)
        .optional()
        .context("Failed to query player identity by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<PlayerIdentity>> {
    let sql = "SELECT id, display_name, team_id, created_at FROM player_identities ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_identity_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
