use super::value::BoardValue;
use crate::api::models::RawItem;
use serde::Serialize;
use std::collections::BTreeMap;

/// One item of a remote board, with every column decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardItem {
    pub id: String,
    pub name: String,
    pub columns: BTreeMap<String, BoardValue>,
}

impl BoardItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            columns: BTreeMap::new(),
        }
    }

    pub fn with(mut self, column_id: &str, value: BoardValue) -> Self {
        self.columns.insert(column_id.to_string(), value);
        self
    }

    /// Decoded column value; columns the board did not return read as empty.
    pub fn column(&self, column_id: &str) -> &BoardValue {
        static EMPTY: BoardValue = BoardValue::Empty;
        self.columns.get(column_id).unwrap_or(&EMPTY)
    }

    /// Decode a raw page item; a malformed column never rejects the item.
    pub fn from_raw(raw: RawItem) -> Self {
        let columns = raw
            .column_values
            .into_iter()
            .map(|c| {
                let decoded = BoardValue::decode(c.value.as_deref(), c.text.as_deref());
                (c.id, decoded)
            })
            .collect();

        Self {
            id: raw.id,
            name: raw.name,
            columns,
        }
    }
}
