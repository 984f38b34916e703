//! Encodes records into column values and applies an action plan.

use crate::api::{BoardApi, ColumnValues};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{ActionPlan, FieldKind, FieldMapping, FieldSpec, MasterRecord, NullPolicy, SourceValue};
use crate::utils::date::{iso_date, parse_flexible_date};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Create,
    Update,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Create => f.write_str("create"),
            WriteMode::Update => f.write_str("update"),
        }
    }
}

/// Value that empties a column of this kind.
fn cleared(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Text | FieldKind::Number => Value::String(String::new()),
        FieldKind::Date => json!({}),
        FieldKind::Status(_) => Value::Null,
    }
}

/// Encoded value of one field; `Ok(None)` leaves the column out.
fn encode_field(field: &FieldSpec, value: &SourceValue, mode: WriteMode) -> AppResult<Option<Value>> {
    let Some(text) = value.as_text() else {
        return Ok(match field.on_null {
            NullPolicy::Omit => None,
            NullPolicy::Clear => Some(cleared(&field.kind)),
        });
    };

    match &field.kind {
        FieldKind::Text | FieldKind::Number => Ok(Some(Value::String(text))),
        FieldKind::Date => {
            if text.trim().is_empty() {
                return Ok(Some(cleared(&field.kind)));
            }
            match parse_flexible_date(&text) {
                Some(d) => Ok(Some(json!({ "date": iso_date(d) }))),
                None if mode == WriteMode::Create => Err(AppError::InvalidDate(format!(
                    "{}: '{}'",
                    field.name, text
                ))),
                None => {
                    warn!(field = %field.name, value = %text, "unparseable date left unchanged");
                    Ok(None)
                }
            }
        }
        FieldKind::Status(options) => {
            let label = text.trim();
            match options.index_of(label) {
                Some(index) => Ok(Some(json!({ "index": index }))),
                None if label.is_empty() => Ok(Some(cleared(&field.kind))),
                None if mode == WriteMode::Create => Err(AppError::UnmappedLabel {
                    field: field.name.clone(),
                    label: label.to_string(),
                }),
                None => {
                    warn!(field = %field.name, label, "value has no option on the board, left unchanged");
                    Ok(None)
                }
            }
        }
    }
}

/// Column values for a create or update of `record`.
///
/// A NULL source value is omitted or cleared per field policy; an empty
/// string is always sent, because the board treats an omitted column
/// as "unchanged" and an empty one as "clear".
pub fn encode_columns(mapping: &FieldMapping, record: &MasterRecord, mode: WriteMode) -> AppResult<ColumnValues> {
    let mut values = ColumnValues::new();
    for field in &mapping.fields {
        if let Some(v) = encode_field(field, record.get(&field.db_column), mode)? {
            values.insert(field.column_id.clone(), v);
        }
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteFailure {
    pub key: String,
    pub mode: WriteMode,
    pub message: String,
}

/// Counts of a plan application; failures do not stop the remaining writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriteSummary {
    pub attempted_creates: usize,
    pub created: usize,
    pub attempted_updates: usize,
    pub updated: usize,
    pub failures: Vec<WriteFailure>,
}

impl WriteSummary {
    pub fn attempted(&self) -> usize {
        self.attempted_creates + self.attempted_updates
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn record_failure(&mut self, key: &str, mode: WriteMode, err: &AppError) {
        error!(key, %mode, error = %err, "board write failed");
        self.failures.push(WriteFailure {
            key: key.to_string(),
            mode,
            message: err.to_string(),
        });
    }
}

pub async fn create_item<A>(api: &A, board_id: &str, mapping: &FieldMapping, record: &MasterRecord) -> AppResult<String>
where
    A: BoardApi + ?Sized,
{
    let values = encode_columns(mapping, record, WriteMode::Create)?;
    let name = mapping.item_name(record);
    Ok(api.create_item(board_id, &name, &values).await?)
}

pub async fn update_item<A>(
    api: &A,
    board_id: &str,
    mapping: &FieldMapping,
    item_id: &str,
    record: &MasterRecord,
) -> AppResult<String>
where
    A: BoardApi + ?Sized,
{
    let values = encode_columns(mapping, record, WriteMode::Update)?;
    Ok(api.change_column_values(board_id, item_id, &values).await?)
}

/// Pacing and rate-limit handling of plan writes.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Pause between two consecutive writes.
    pub delay: Duration,
    /// Pause before repeating a rate-limited write.
    pub rate_limit_backoff: Duration,
    /// Rate-limit retries of one write before it counts as failed.
    pub max_rate_limit_retries: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(200),
            rate_limit_backoff: Duration::from_secs(5),
            max_rate_limit_retries: 5,
        }
    }
}

impl From<&Config> for WriteOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            delay: Duration::from_millis(cfg.write_delay_ms),
            rate_limit_backoff: Duration::from_millis(cfg.rate_limit_backoff_ms),
            max_rate_limit_retries: cfg.max_rate_limit_retries,
        }
    }
}

fn is_rate_limited(err: &AppError) -> bool {
    matches!(err, AppError::Api(e) if e.is_rate_limited())
}

/// Run `call` until it succeeds, fails for another reason, or stays
/// rate limited past `opts.max_rate_limit_retries`.
async fn with_rate_limit_retry<F, Fut>(key: &str, mode: WriteMode, opts: &WriteOptions, mut call: F) -> AppResult<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<String>>,
{
    let mut retries = 0u32;
    loop {
        match call().await {
            Err(e) if is_rate_limited(&e) && retries < opts.max_rate_limit_retries => {
                retries += 1;
                warn!(
                    key,
                    %mode,
                    retry = retries,
                    backoff_ms = opts.rate_limit_backoff.as_millis() as u64,
                    error = %e,
                    "rate limited, retrying same write"
                );
                tokio::time::sleep(opts.rate_limit_backoff).await;
            }
            other => return other,
        }
    }
}

/// Issue every create, then every update, one call at a time with
/// `opts.delay` between consecutive calls.
///
/// A rate-limited write is repeated after `opts.rate_limit_backoff`;
/// any other failure is recorded and the next write proceeds.
pub async fn apply_plan<A>(
    api: &A,
    board_id: &str,
    mapping: &FieldMapping,
    plan: &ActionPlan,
    opts: &WriteOptions,
) -> WriteSummary
where
    A: BoardApi + ?Sized,
{
    let mut summary = WriteSummary::default();
    let mut first = true;

    for record in &plan.to_create {
        if !std::mem::take(&mut first) {
            tokio::time::sleep(opts.delay).await;
        }
        summary.attempted_creates += 1;
        let result = with_rate_limit_retry(&record.key, WriteMode::Create, opts, || {
            create_item(api, board_id, mapping, record)
        })
        .await;
        match result {
            Ok(id) => {
                info!(key = %record.key, item_id = %id, "item created");
                summary.created += 1;
            }
            Err(e) => summary.record_failure(&record.key, WriteMode::Create, &e),
        }
    }

    for action in &plan.to_update {
        if !std::mem::take(&mut first) {
            tokio::time::sleep(opts.delay).await;
        }
        summary.attempted_updates += 1;
        let result = with_rate_limit_retry(&action.record.key, WriteMode::Update, opts, || {
            update_item(api, board_id, mapping, &action.item_id, &action.record)
        })
        .await;
        match result {
            Ok(id) => {
                info!(key = %action.record.key, item_id = %id, "item updated");
                summary.updated += 1;
            }
            Err(e) => summary.record_failure(&action.record.key, WriteMode::Update, &e),
        }
    }

    summary
}
