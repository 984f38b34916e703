use super::record::MasterRecord;
use super::value::{BoardValue, SourceValue};
use serde::Serialize;

/// One divergent field of a paired record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub db_value: SourceValue,
    pub remote_value: BoardValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateAction {
    pub item_id: String,
    pub record: MasterRecord,
    /// Kept for reporting only: updates always send the whole record.
    pub diffs: Vec<FieldDiff>,
}

impl UpdateAction {
    pub fn describe_diffs(&self) -> String {
        self.diffs
            .iter()
            .map(|d| format!("{}: {} → {}", d.field, d.db_value, d.remote_value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Result of reconciling a DB snapshot against a board snapshot.
///
/// There is no delete set: records that disappear from the view are
/// never propagated to the board.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ActionPlan {
    pub to_create: Vec<MasterRecord>,
    pub to_update: Vec<UpdateAction>,
}

impl ActionPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}
