//! Pairs view records with board items and plans the writes.

use crate::core::compare::values_equal;
use crate::models::record::normalize_key;
use crate::models::{ActionPlan, BoardItem, FieldDiff, FieldMapping, MasterRecord, UpdateAction};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, info_span, warn};

/// Divergent fields of one paired record, in mapping order.
pub fn diff_record(mapping: &FieldMapping, record: &MasterRecord, item: &BoardItem) -> Vec<FieldDiff> {
    let _span = info_span!("compare", key = %record.key, item_id = %item.id).entered();

    mapping
        .fields
        .iter()
        .filter_map(|field| {
            let db = record.get(&field.db_column);
            let remote = item.column(&field.column_id);
            if values_equal(field, db, remote) {
                None
            } else {
                Some(FieldDiff {
                    field: field.name.clone(),
                    db_value: db.clone(),
                    remote_value: remote.clone(),
                })
            }
        })
        .collect()
}

/// Build the action plan for one domain.
///
/// Keys are matched trimmed and case-insensitively. Board items without
/// a view record are left alone. Both output sets are ordered by key so
/// the plan does not depend on snapshot order.
pub fn reconcile(mapping: &FieldMapping, records: &[MasterRecord], items: &[BoardItem]) -> ActionPlan {
    let mut by_key: HashMap<String, &MasterRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_key.entry(normalize_key(&record.key)).or_insert(record);
    }

    let mut paired: HashSet<String> = HashSet::new();
    let mut to_update = Vec::new();

    for item in items {
        let key = mapping.remote_match_key(item);
        let Some(record) = by_key.get(&key) else {
            debug!(item_id = %item.id, key = %key, "board item has no view record, ignored");
            continue;
        };

        if !paired.insert(key.clone()) {
            warn!(item_id = %item.id, key = %key, "duplicate business key on board, keeping first item");
            continue;
        }

        let diffs = diff_record(mapping, record, item);
        if !diffs.is_empty() {
            info!(key = %record.key, item_id = %item.id, fields = diffs.len(), "record changed");
            to_update.push(UpdateAction {
                item_id: item.id.clone(),
                record: (*record).clone(),
                diffs,
            });
        }
    }

    let mut to_create: Vec<MasterRecord> = by_key
        .iter()
        .filter(|(key, _)| !paired.contains(*key))
        .map(|(_, record)| (*record).clone())
        .collect();

    to_create.sort_by_key(|r| normalize_key(&r.key));
    to_update.sort_by_key(|u| normalize_key(&u.record.key));

    info!(
        domain = %mapping.domain,
        create = to_create.len(),
        update = to_update.len(),
        "reconciliation finished"
    );

    ActionPlan {
        to_create,
        to_update,
    }
}
