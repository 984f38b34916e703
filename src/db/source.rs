//! Reads the reporting view of a domain into master records.

use crate::errors::{AppError, AppResult};
use crate::models::{FieldMapping, MasterRecord, SourceValue};
use crate::models::record::normalize_column;
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{info, warn};

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Load every row of the mapping's view in one query.
///
/// Column names are normalized with [`normalize_column`]. Rows without
/// a business key are skipped; a repeated key keeps the first row. Any SQL failure is returned to the caller unchanged.
pub fn load_master_records(conn: &Connection, mapping: &FieldMapping) -> AppResult<Vec<MasterRecord>> {
    let sql = format!("SELECT * FROM {}", quote_ident(&mapping.source_view));
    let mut stmt = conn.prepare(&sql)?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(normalize_column).collect();
    let key_column = normalize_column(&mapping.key_column);
    let key_idx = columns
        .iter()
        .position(|c| *c == key_column)
        .ok_or_else(|| {
            AppError::Source(format!(
                "view {} has no key column {}",
                mapping.source_view, mapping.key_column
            ))
        })?;

    let mut rows = stmt.query([])?;
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    while let Some(row) = rows.next()? {
        let key = SourceValue::from(row.get_ref(key_idx)?)
            .as_text()
            .map(|k| k.trim().to_string())
            .unwrap_or_default();

        if key.is_empty() {
            warn!(view = %mapping.source_view, "row without business key skipped");
            continue;
        }
        if !seen.insert(key.to_lowercase()) {
            warn!(view = %mapping.source_view, key = %key, "duplicate business key in view, keeping first row");
            continue;
        }

        let mut record = MasterRecord::new(key);
        for (idx, name) in columns.iter().enumerate() {
            let value = SourceValue::from(row.get_ref(idx)?);
            // first of two columns differing only in case wins
            record.fields.entry(name.clone()).or_insert(value);
        }
        out.push(record);
    }

    info!(view = %mapping.source_view, records = out.len(), "loaded master records");
    Ok(out)
}
