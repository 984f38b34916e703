use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::{print_log, print_runs};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print, runs } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        if *print {
            print_log(&pool.conn)?;
        }
        if *runs {
            print_runs(&pool.conn)?;
        }
        if !*print && !*runs {
            println!("Nothing to show: use --print or --runs.");
        }
    }

    Ok(())
}
