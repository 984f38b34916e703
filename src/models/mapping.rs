//! Static association between view columns and board columns.
//!
//! A single `FieldMapping` is built per run and handed to every component
//! that decodes, compares or encodes values, so the three always agree on
//! column ids and option tables.

use super::board_item::BoardItem;
use super::record::{MasterRecord, normalize_key};

/// Label → index table of a status/dropdown column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusOptions {
    options: Vec<(String, i64)>,
}

impl StatusOptions {
    pub fn new(options: &[(&str, i64)]) -> Self {
        Self {
            options: options
                .iter()
                .map(|(label, index)| (label.to_string(), *index))
                .collect(),
        }
    }

    /// Index of a label; labels are compared after trimming.
    pub fn index_of(&self, label: &str) -> Option<i64> {
        let label = label.trim();
        self.options
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, i)| *i)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Status(StatusOptions),
}

/// What an update does with a NULL source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Leave the remote column untouched.
    Omit,
    /// Send the column's "cleared" value.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub db_column: String,
    pub column_id: String,
    pub kind: FieldKind,
    pub on_null: NullPolicy,
}

impl FieldSpec {
    pub fn new(name: &str, db_column: &str, column_id: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            db_column: db_column.to_string(),
            column_id: column_id.to_string(),
            kind,
            on_null: NullPolicy::Omit,
        }
    }

    pub fn clear_on_null(mut self) -> Self {
        self.on_null = NullPolicy::Clear;
        self
    }
}

/// Where the business key lives on a board item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    ItemName,
    Column(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub domain: String,
    /// Reporting view the records are read from.
    pub source_view: String,
    /// View column holding the business key.
    pub key_column: String,
    pub key_source: KeySource,
    /// View column used as item name when creating items.
    pub item_name_column: String,
    pub fields: Vec<FieldSpec>,
}

impl FieldMapping {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Raw business key of a board item.
    pub fn remote_key(&self, item: &BoardItem) -> String {
        match &self.key_source {
            KeySource::ItemName => item.name.clone(),
            KeySource::Column(id) => item.column(id).as_text(),
        }
    }

    pub fn remote_match_key(&self, item: &BoardItem) -> String {
        normalize_key(&self.remote_key(item))
    }

    /// Name for a newly created item, falling back to the business key.
    pub fn item_name(&self, record: &MasterRecord) -> String {
        record
            .text(&self.item_name_column)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| record.key.clone())
    }
}
