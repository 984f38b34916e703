//! One synchronization run of a domain: view → board.

use crate::api::BoardApi;
use crate::core::reader::{FetchOptions, fetch_all_items};
use crate::core::reconcile::reconcile;
use crate::core::report::{Notifier, build_report};
use crate::core::writer::{WriteOptions, WriteSummary, apply_plan};
use crate::db::log::ttlog;
use crate::db::runs::{RunTotals, finish_run, start_run};
use crate::db::source::load_master_records;
use crate::errors::AppResult;
use crate::models::{ActionPlan, FieldMapping};
use rusqlite::Connection;
use tracing::{error, info, info_span, warn, Instrument};

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub board_id: String,
    pub fetch: FetchOptions,
    pub write: WriteOptions,
    /// Reconcile only: no writes, no run record, no report.
    pub dry_run: bool,
    pub notify_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// `None` for dry runs.
    pub run_id: Option<i64>,
    pub records: usize,
    pub remote_items: usize,
    pub remote_complete: bool,
    pub plan: ActionPlan,
    pub summary: WriteSummary,
}

/// Run a full synchronization.
///
/// A view read failure aborts the run and leaves its run record open.
/// Remote failures after the first page and individual write failures
/// are logged and the run continues.
pub async fn run_sync<A>(
    conn: &Connection,
    api: &A,
    mapping: &FieldMapping,
    settings: &SyncSettings,
    notifier: &dyn Notifier,
) -> AppResult<SyncOutcome>
where
    A: BoardApi + ?Sized,
{
    let span = info_span!("sync", domain = %mapping.domain, board_id = %settings.board_id);
    run_inner(conn, api, mapping, settings, notifier)
        .instrument(span)
        .await
}

async fn run_inner<A>(
    conn: &Connection,
    api: &A,
    mapping: &FieldMapping,
    settings: &SyncSettings,
    notifier: &dyn Notifier,
) -> AppResult<SyncOutcome>
where
    A: BoardApi + ?Sized,
{
    let run_id = if settings.dry_run {
        None
    } else {
        Some(start_run(conn, &mapping.domain)?)
    };
    info!(run_id, dry_run = settings.dry_run, "sync started");

    let records = load_master_records(conn, mapping)?;
    let snapshot = fetch_all_items(api, &settings.board_id, &settings.fetch).await?;

    if !snapshot.complete {
        warn!(
            items = snapshot.items.len(),
            "board snapshot is incomplete; existing items may be planned as new"
        );
    }

    let plan = reconcile(mapping, &records, &snapshot.items);

    let summary = if settings.dry_run {
        WriteSummary::default()
    } else {
        apply_plan(api, &settings.board_id, mapping, &plan, &settings.write).await
    };

    if let Some(id) = run_id {
        for failure in &summary.failures {
            let msg = format!("{} failed: {}", failure.mode, failure.message);
            if let Err(e) = ttlog(conn, "write_failed", &failure.key, &msg) {
                warn!(error = %e, "failed to write internal log");
            }
        }

        finish_run(
            conn,
            id,
            &RunTotals {
                created: summary.created as i64,
                updated: summary.updated as i64,
                failed: summary.failed() as i64,
                remote_complete: snapshot.complete,
            },
        )?;

        let msg = format!(
            "run {id}: {} new, {} changed, {} created, {} updated, {} failed",
            plan.to_create.len(),
            plan.to_update.len(),
            summary.created,
            summary.updated,
            summary.failed()
        );
        if let Err(e) = ttlog(conn, "sync", &mapping.domain, &msg) {
            warn!(error = %e, "failed to write internal log");
        }

        if let Some(to) = settings.notify_to.as_deref().filter(|t| !t.trim().is_empty()) {
            let report = build_report(mapping, &plan, &summary, to.trim());
            if let Err(e) = notifier.deliver(&report) {
                error!(error = %e, "report delivery failed");
            }
        }
    }

    info!(
        create = plan.to_create.len(),
        update = plan.to_update.len(),
        failed = summary.failed(),
        "sync finished"
    );

    Ok(SyncOutcome {
        run_id,
        records: records.len(),
        remote_items: snapshot.items.len(),
        remote_complete: snapshot.complete,
        plan,
        summary,
    })
}
