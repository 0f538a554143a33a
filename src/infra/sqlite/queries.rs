use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::infra::sqlite::schema::open_connection;

pub fn get_entry(db_path: &Path, key: &str) -> Result<Option<String>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT value FROM kv_entry WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .with_context(|| format!("failed to read entry {key}"))
}

pub fn set_entry(db_path: &Path, key: &str, value: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO kv_entry(key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("failed to write entry {key}"))?;
    Ok(())
}

pub fn remove_entry(db_path: &Path, key: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM kv_entry WHERE key = ?1", params![key])
        .with_context(|| format!("failed to remove entry {key}"))?;
    Ok(())
}

pub fn list_entries(db_path: &Path, prefix: &str) -> Result<Vec<(String, String)>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT key, value
             FROM kv_entry
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC",
        )
        .context("failed to prepare entry listing")?;

    let entries = stmt
        .query_map(params![prefix], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to query entries")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect entries")?;

    Ok(entries)
}
