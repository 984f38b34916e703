use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, params};

/// A schema step, applied once and remembered in the `log` table.
struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250410_0001_create_sync_runs",
        message: "Created sync_runs table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sync_runs (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            domain       TEXT NOT NULL,
            started_at   TEXT NOT NULL,
            finished_at  TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_sync_runs_domain ON sync_runs(domain, started_at);
        "#,
    },
    Migration {
        version: "20250522_0002_sync_run_counters",
        message: "Added write counters to sync_runs",
        sql: r#"
        ALTER TABLE sync_runs ADD COLUMN created INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE sync_runs ADD COLUMN updated INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE sync_runs ADD COLUMN failed  INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE sync_runs ADD COLUMN remote_complete INTEGER NOT NULL DEFAULT 1;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", m.sql))
        .map_err(|e| {
            let _ = conn.execute_batch("ROLLBACK;");
            AppError::Migration(format!("{}: {e}", m.version))
        })?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.message],
    )?;

    success(format!("Migration applied: {} → {}", m.version, m.message));
    Ok(())
}

/// Public entry point: run all pending migrations in order.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
