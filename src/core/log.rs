use crate::db::log::load_log;
use crate::db::runs::list_runs;
use crate::errors::AppResult;
use crate::models::SyncRun;
use crate::utils::table::Table;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;

static ANSI_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "sync" => Colour::Green,
        "write_failed" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

const OP_MAX: usize = 60;

/// Print the internal `log` table.
pub fn print_log(conn: &Connection) -> AppResult<()> {
    let entries = load_log(conn)?;

    if entries.is_empty() {
        println!("📜 Internal log is empty.");
        return Ok(());
    }

    let rows: Vec<(i64, String, String, String, String)> = entries
        .into_iter()
        .map(|e| {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(e.date);
            let op_target = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };
            (e.id, date, e.operation, op_target, e.message)
        })
        .collect();

    let op_w = rows
        .iter()
        .map(|(_, _, _, op_target, _)| op_target.chars().count())
        .max()
        .unwrap_or(10)
        .min(OP_MAX);
    let id_w = rows
        .iter()
        .map(|(id, _, _, _, _)| id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = rows
        .iter()
        .map(|(_, date, _, _, _)| date.len())
        .max()
        .unwrap_or(0);

    println!("📜 Internal log:\n");

    for (id, date, operation, op_target, message) in rows {
        let color = color_for_operation(&operation);

        let visible = if op_target.chars().count() > OP_MAX {
            let mut s: String = op_target.chars().take(OP_MAX - 3).collect();
            s.push_str("...");
            s
        } else {
            op_target
        };

        // only the operation word is colored
        let colored = match visible.split_once(' ') {
            Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
            None => color.paint(visible.as_str()).to_string(),
        };

        let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

        println!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            id,
            date,
            colored,
            padding,
            message,
            id_w = id_w,
            date_w = date_w
        );
    }

    Ok(())
}

fn run_state(run: &SyncRun, latest_open: Option<i64>) -> String {
    if !run.is_open() {
        if run.remote_complete {
            "done".to_string()
        } else {
            "partial".to_string()
        }
    } else if Some(run.id) == latest_open {
        "running".to_string()
    } else {
        "aborted".to_string()
    }
}

/// Render the `sync_runs` table; an open run older than the newest one
/// never finished.
pub fn render_runs(runs: &[SyncRun]) -> String {
    let latest_open = runs.last().filter(|r| r.is_open()).map(|r| r.id);

    let mut table = Table::with_headers(&[
        "ID", "DOMAIN", "STARTED", "FINISHED", "CREATED", "UPDATED", "FAILED", "STATE",
    ]);

    for run in runs {
        table.add_row(vec![
            run.id.to_string(),
            run.domain.clone(),
            run.started_at.clone(),
            run.finished_at.clone().unwrap_or_else(|| "-".to_string()),
            run.created.to_string(),
            run.updated.to_string(),
            run.failed.to_string(),
            run_state(run, latest_open),
        ]);
    }

    table.render()
}

pub fn print_runs(conn: &Connection) -> AppResult<()> {
    let runs = list_runs(conn)?;
    if runs.is_empty() {
        println!("No synchronization runs recorded.");
        return Ok(());
    }
    println!("🔄 Synchronization runs:\n");
    print!("{}", render_runs(&runs));
    Ok(())
}
