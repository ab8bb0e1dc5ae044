use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Review;

pub fn insert_review(
    conn: &Connection,
    scrim_id: i64,
    performance: &str,
    notes: Option<&str>,
) -> Result<Review> {
    let sql = "INSERT INTO scrim_reviews (scrim_id, performance, notes) VALUES (?1, ?2, ?3) RETURNING id, scrim_id, performance, notes, created_at";

    conn.query_row(sql, params![scrim_id, performance, notes], parse_review_row)
        .context("Failed to insert scrim review")
}

fn parse_review_row(row: &rusqlite::Row) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        scrim_id: row.get(1)?,
        performance: row.get(2)?,
        notes: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn latest_for_scrim(conn: &Connection, scrim_id: i64) -> Result<Option<Review>> {
    let sql = "SELECT id, scrim_id, performance, notes, created_at FROM scrim_reviews WHERE scrim_id = ?1 ORDER BY id DESC LIMIT 1";

    conn.query_row(sql, params![scrim_id], parse_review_row)
        .optional()
        .context("Failed to query latest review for scrim")
}
