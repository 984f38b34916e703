use crate::api::MondayClient;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reader::FetchOptions;
use crate::core::report::LogNotifier;
use crate::core::sync::{SyncOutcome, SyncSettings, run_sync};
use crate::core::writer::WriteOptions;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::FieldMapping;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::table::Table;
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { domain, dry_run } = cmd {
        let mapping = domain.mapping(cfg.view_for(*domain));
        let settings = SyncSettings {
            board_id: cfg.board_for(*domain)?.to_string(),
            fetch: FetchOptions::from(cfg),
            write: WriteOptions::from(cfg),
            dry_run: *dry_run,
            notify_to: cfg.notify_to.clone(),
        };

        let client = MondayClient::from_config(cfg)?;
        let pool = DbPool::with_timeout(&cfg.database, Duration::from_secs(cfg.db_timeout_secs))?;
        init_db(&pool.conn)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::from)?;

        header(format!(
            "Sync {} ← {}{}",
            domain,
            mapping.source_view,
            if *dry_run { " (dry run)" } else { "" }
        ));

        let outcome = runtime.block_on(run_sync(
            &pool.conn,
            &client,
            &mapping,
            &settings,
            &LogNotifier,
        ))?;

        print_outcome(&mapping, &outcome, *dry_run);
    }

    Ok(())
}

fn print_outcome(mapping: &FieldMapping, outcome: &SyncOutcome, dry_run: bool) {
    info(format!(
        "{} view records, {} board items{}",
        outcome.records,
        outcome.remote_items,
        if outcome.remote_complete { "" } else { " (incomplete snapshot)" }
    ));

    if !outcome.remote_complete {
        warning("The board could not be read completely; some items planned as new may already exist.");
    }

    if outcome.plan.is_empty() {
        success("Board is in sync, nothing to do.");
        return;
    }

    if dry_run {
        if !outcome.plan.to_create.is_empty() {
            println!("\nTo create ({}):", outcome.plan.to_create.len());
            let mut table = Table::with_headers(&[mapping.key_column.as_str(), "item name"]);
            for r in &outcome.plan.to_create {
                table.add_row(vec![r.key.clone(), mapping.item_name(r)]);
            }
            print!("{}", table.render());
        }
        if !outcome.plan.to_update.is_empty() {
            println!("\nTo update ({}):", outcome.plan.to_update.len());
            let mut table =
                Table::with_headers(&[mapping.key_column.as_str(), "item id", "differences"]);
            for u in &outcome.plan.to_update {
                table.add_row(vec![u.record.key.clone(), u.item_id.clone(), u.describe_diffs()]);
            }
            print!("{}", table.render());
        }
        return;
    }

    let s = &outcome.summary;
    let line = format!(
        "Created {}/{}, updated {}/{}",
        s.created, s.attempted_creates, s.updated, s.attempted_updates
    );
    if s.failed() == 0 {
        success(line);
    } else {
        warning(format!("{line}, {} failed (see `boardsync log --print`)", s.failed()));
    }
    if let Some(id) = outcome.run_id {
        info(format!("Run #{id} recorded"));
    }
}
