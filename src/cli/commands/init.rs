use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use rusqlite::Connection;
use std::path::Path;

/// Handle the `init` command
///
/// Creates the config directory and file (unless in test mode), the
/// SQLite database and its schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let config_path = cli.config.as_deref().map(Path::new);
    let cfg = Config::init_all(cli.db.clone(), config_path, cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing boardsync…");
    if !cli.test {
        let shown = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::config_file);
        println!("📄 Config file : {}", shown.display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let conn = Connection::open(&db_path)?;
    init_db(&conn)?;

    println!("✅ Database initialized at {}", &db_path);

    if let Err(e) = log::ttlog(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 boardsync initialization completed!");
    println!("   Set api_key and the board ids in the config file before the first sync.");
    Ok(())
}
