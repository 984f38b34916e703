use super::value::SourceValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of a reporting view, keyed by its business code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterRecord {
    pub key: String,
    /// View columns by normalized name.
    pub fields: BTreeMap<String, SourceValue>,
}

impl MasterRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder used by tests and presets.
    pub fn with(mut self, column: &str, value: impl Into<SourceValue>) -> Self {
        self.fields.insert(normalize_column(column), value.into());
        self
    }

    /// Value of a column, matched case-insensitively; a column missing
    /// from the row reads as NULL.
    pub fn get(&self, column: &str) -> &SourceValue {
        static NULL: SourceValue = SourceValue::Null;
        self.fields
            .get(column)
            .or_else(|| self.fields.get(&normalize_column(column)))
            .unwrap_or(&NULL)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).as_text()
    }
}

/// Normalized form of a business key used for matching both sides.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Column names are stored trimmed and ASCII-lowercased, so views may
/// spell them in any case.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
