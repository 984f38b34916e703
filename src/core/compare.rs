//! Field-level equality between a view value and a board value.

use crate::models::{BoardValue, FieldKind, FieldSpec, SourceValue, StatusOptions};
use crate::utils::date::parse_flexible_date;
use tracing::{info, warn};

/// Whether `db` and `remote` hold the same value for `field`.
///
/// Every negative answer is logged with both raw values.
pub fn values_equal(field: &FieldSpec, db: &SourceValue, remote: &BoardValue) -> bool {
    let equal = match &field.kind {
        FieldKind::Text => text_equal(db, remote),
        FieldKind::Number => number_equal(db, remote),
        FieldKind::Date => date_equal(field, db, remote),
        FieldKind::Status(options) => status_equal(field, options, db, remote),
    };

    if !equal {
        info!(field = %field.name, db = %db, remote = %remote, "field differs");
    }
    equal
}

/// NULL, missing and empty all read as "".
fn db_text(db: &SourceValue) -> String {
    db.as_text().unwrap_or_default()
}

fn text_equal(db: &SourceValue, remote: &BoardValue) -> bool {
    db_text(db).trim() == remote.as_text().trim()
}

fn number_equal(db: &SourceValue, remote: &BoardValue) -> bool {
    let left = db_text(db);
    let right = remote.as_text();
    let (left, right) = (left.trim(), right.trim());

    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b || (a - b).abs() < 1e-9,
        _ => left == right,
    }
}

fn date_equal(field: &FieldSpec, db: &SourceValue, remote: &BoardValue) -> bool {
    let left = db_text(db);
    let right = remote.as_text();
    let (left, right) = (left.trim(), right.trim());

    match (left.is_empty(), right.is_empty()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }

    match (parse_flexible_date(left), parse_flexible_date(right)) {
        (Some(a), Some(b)) => a == b,
        (a, b) => {
            warn!(
                field = %field.name,
                db = left,
                remote = right,
                db_parsed = a.is_some(),
                remote_parsed = b.is_some(),
                "unparseable date, treating as different"
            );
            false
        }
    }
}

/// Resolved option index as text, "" when the side is blank.
fn resolve_remote(options: &StatusOptions, remote: &BoardValue) -> Option<String> {
    match remote {
        BoardValue::EnumIndex(i) => Some(i.to_string()),
        BoardValue::Empty => Some(
            options
                .index_of("")
                .map(|i| i.to_string())
                .unwrap_or_default(),
        ),
        BoardValue::Scalar(s) | BoardValue::Date(s) => {
            let s = s.trim();
            if let Some(i) = options.index_of(s) {
                Some(i.to_string())
            } else if s.is_empty() {
                Some(String::new())
            } else {
                s.parse::<i64>().ok().map(|i| i.to_string())
            }
        }
    }
}

fn status_equal(
    field: &FieldSpec,
    options: &StatusOptions,
    db: &SourceValue,
    remote: &BoardValue,
) -> bool {
    let label = db_text(db);
    let label = label.trim();

    let db_index = match options.index_of(label) {
        Some(i) => i.to_string(),
        None if label.is_empty() => String::new(),
        None => {
            warn!(field = %field.name, label, "value has no option on the board");
            return false;
        }
    };

    match resolve_remote(options, remote) {
        Some(remote_index) => db_index == remote_index,
        None => {
            warn!(field = %field.name, remote = %remote, "board label has no known option");
            false
        }
    }
}
