use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Team;

pub fn create_team(conn: &Connection, name: &str) -> Result<Team> {
    let sql = "INSERT INTO teams (name) VALUES (?1) RETURNING id, name, created_at";

    conn.query_row(sql, params![name], parse_team_row)
        .context("Failed to insert team")
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Team>> {
    let sql = "SELECT id, name, created_at FROM teams WHERE id = ?1";

    conn.query_row(sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}
