use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::logparse::Event;

/// Persists a map's full event sequence, write-once, in row order. The
/// payload is the serde-tagged variant, so a row round-trips to the exact
/// typed event it was parsed as.
pub fn insert_map_events(conn: &Connection, map_id: i64, events: &[Event]) -> Result<()> {
    let sql = "INSERT INTO map_events (map_id, seq, kind, payload) VALUES (?1, ?2, ?3, ?4)";
    let mut stmt = conn.prepare(sql)?;

    for (seq, event) in events.iter().enumerate() {
        let payload = serde_json::to_string(event).context("Failed to serialize event payload")?;
        stmt.execute(params![map_id, seq as i64, event.kind(), payload])
            .context("Failed to insert event row")?;
    }

    Ok(())
}

pub fn load_for_map(conn: &Connection, map_id: i64) -> Result<Vec<Event>> {
    let sql = "SELECT payload FROM map_events WHERE map_id = ?1 ORDER BY seq";

    let mut stmt = conn.prepare(sql)?;
    let payloads = stmt
        .query_map(params![map_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    payloads
        .iter()
        .map(|payload| {
            serde_json::from_str(payload)
                .with_context(|| format!("Failed to decode event payload for map {map_id}"))
        })
        .collect()
}

