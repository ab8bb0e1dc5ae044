use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::identity::RosterEntry;

use super::models::RosterRow;

pub fn insert_map_roster(conn: &Connection, map_id: i64, roster: &[RosterEntry]) -> Result<()> {
    let sql =
        "INSERT INTO map_rosters (map_id, team_name, raw_name, identity_id) VALUES (?1, ?2, ?3, ?4)";
    let mut stmt = conn.prepare(sql)?;

    for entry in roster {
        stmt.execute(params![
            map_id,
            entry.team_name,
            entry.raw_name,
            entry.identity_id
        ])
        .context("Failed to insert roster row")?;
    }

    Ok(())
}

pub fn list_for_map(conn: &Connection, map_id: i64) -> Result<Vec<RosterRow>> {
    let sql = "SELECT id, map_id, team_name, raw_name, identity_id FROM map_rosters WHERE map_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![map_id], parse_roster_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_roster_row(row: &rusqlite::Row) -> rusqlite::Result<RosterRow> {
    Ok(RosterRow {
        id: row.get(0)?,
        map_id: row.get(1)?,
        team_name: row.get(2)?,
        raw_name: row.get(3)?,
        identity_id: row.get(4)?,
    })
}
