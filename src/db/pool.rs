//! SQLite connection wrapper (one connection per run).

use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self { conn })
    }

    /// Open with a per-call busy timeout.
    pub fn with_timeout(path: &str, timeout: Duration) -> Result<Self> {
        let pool = Self::new(path)?;
        pool.conn.busy_timeout(timeout)?;
        Ok(pool)
    }
}
