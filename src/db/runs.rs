//! The `sync_runs` table: one row per synchronization run.

use crate::errors::AppResult;
use crate::models::SyncRun;
use chrono::Local;
use rusqlite::{Connection, Row, params};

/// Counters written when a run closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub created: i64,
    pub updated: i64,
    pub failed: i64,
    pub remote_complete: bool,
}

/// Open a run and return its id.
pub fn start_run(conn: &Connection, domain: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sync_runs (domain, started_at) VALUES (?1, ?2)",
        params![domain, Local::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Close a run by stamping its end time and counters.
pub fn finish_run(conn: &Connection, id: i64, totals: &RunTotals) -> AppResult<()> {
    conn.execute(
        "UPDATE sync_runs
            SET finished_at = ?1, created = ?2, updated = ?3, failed = ?4, remote_complete = ?5
          WHERE id = ?6",
        params![
            Local::now().to_rfc3339(),
            totals.created,
            totals.updated,
            totals.failed,
            totals.remote_complete,
            id
        ],
    )?;
    Ok(())
}

fn map_run(row: &Row) -> rusqlite::Result<SyncRun> {
    Ok(SyncRun {
        id: row.get("id")?,
        domain: row.get("domain")?,
        started_at: row.get("started_at")?,
        finished_at: row.get("finished_at")?,
        created: row.get("created")?,
        updated: row.get("updated")?,
        failed: row.get("failed")?,
        remote_complete: row.get("remote_complete")?,
    })
}

pub fn load_run(conn: &Connection, id: i64) -> AppResult<SyncRun> {
    let run = conn.query_row(
        "SELECT id, domain, started_at, finished_at, created, updated, failed, remote_complete
           FROM sync_runs WHERE id = ?1",
        [id],
        map_run,
    )?;
    Ok(run)
}

/// All runs, oldest first.
pub fn list_runs(conn: &Connection) -> AppResult<Vec<SyncRun>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, domain, started_at, finished_at, created, updated, failed, remote_complete
           FROM sync_runs ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], map_run)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
