//! Run report handed to the notification channel.

use crate::core::writer::WriteSummary;
use crate::errors::AppResult;
use crate::models::{ActionPlan, FieldMapping, MasterRecord};
use crate::ui::messages::info;
use chrono::Local;
use serde::Serialize;

/// A named table attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularAttachment {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<TabularAttachment>,
}

/// External notification channel.
pub trait Notifier {
    fn deliver(&self, report: &RunReport) -> AppResult<()>;
}

/// Writes reports to the tracing stream and the console.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, report: &RunReport) -> AppResult<()> {
        tracing::info!(
            recipient = %report.recipient,
            subject = %report.subject,
            attachments = report.attachments.len(),
            "run report"
        );
        info(format!("Report for {}: {}", report.recipient, report.subject));
        for a in &report.attachments {
            info(format!("  {} ({} rows)", a.name, a.rows.len()));
        }
        Ok(())
    }
}

/// Mapped view columns other than the key, which always comes first.
fn report_columns(mapping: &FieldMapping) -> impl Iterator<Item = &str> {
    mapping
        .fields
        .iter()
        .map(|f| f.db_column.as_str())
        .filter(|c| *c != mapping.key_column)
}

fn record_row(mapping: &FieldMapping, record: &MasterRecord) -> Vec<String> {
    std::iter::once(record.key.clone())
        .chain(report_columns(mapping).map(|c| record.text(c).unwrap_or_default()))
        .collect()
}

fn record_headers(mapping: &FieldMapping) -> Vec<String> {
    std::iter::once(mapping.key_column.as_str())
        .chain(report_columns(mapping))
        .map(String::from)
        .collect()
}

/// Build the report of a finished run; attachments only for non-empty sets.
pub fn build_report(
    mapping: &FieldMapping,
    plan: &ActionPlan,
    summary: &WriteSummary,
    recipient: &str,
) -> RunReport {
    let mut attachments = Vec::new();

    if !plan.to_create.is_empty() {
        attachments.push(TabularAttachment {
            name: format!("{}_new", mapping.domain),
            headers: record_headers(mapping),
            rows: plan
                .to_create
                .iter()
                .map(|r| record_row(mapping, r))
                .collect(),
        });
    }

    if !plan.to_update.is_empty() {
        let mut headers = vec!["item_id".to_string()];
        headers.extend(record_headers(mapping));
        headers.push("differences".to_string());

        attachments.push(TabularAttachment {
            name: format!("{}_changed", mapping.domain),
            headers,
            rows: plan
                .to_update
                .iter()
                .map(|u| {
                    let mut row = vec![u.item_id.clone()];
                    row.extend(record_row(mapping, &u.record));
                    row.push(u.describe_diffs());
                    row
                })
                .collect(),
        });
    }

    let body = if plan.is_empty() {
        "No differences found; board is in sync.".to_string()
    } else {
        format!(
            "{} new, {} changed. Created {}/{}, updated {}/{}, {} failed.",
            plan.to_create.len(),
            plan.to_update.len(),
            summary.created,
            summary.attempted_creates,
            summary.updated,
            summary.attempted_updates,
            summary.failed()
        )
    };

    RunReport {
        recipient: recipient.to_string(),
        subject: format!(
            "Board sync ({}) finished: {}",
            mapping.domain,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        body,
        attachments,
    }
}
