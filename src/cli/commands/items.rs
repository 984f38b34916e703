use crate::api::MondayClient;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reader::{FetchOptions, fetch_all_items};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Items { domain, json } = cmd {
        let mapping = domain.mapping(cfg.view_for(*domain));
        let board_id = cfg.board_for(*domain)?;
        let client = MondayClient::from_config(cfg)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::from)?;

        let snapshot = runtime.block_on(fetch_all_items(&client, board_id, &FetchOptions::from(cfg)))?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&snapshot.items)?);
        } else {
            let mut table = Table::with_headers(&["ID", "KEY", "NAME"]);
            for item in &snapshot.items {
                table.add_row(vec![
                    item.id.clone(),
                    mapping.remote_key(item),
                    item.name.clone(),
                ]);
            }
            print!("{}", table.render());
            println!("\n{} items in {} pages", snapshot.items.len(), snapshot.pages);
        }

        // stdout stays pure JSON with --json
        if !snapshot.complete {
            if *json {
                tracing::warn!(board_id, "snapshot is incomplete");
            } else {
                warning("Snapshot is incomplete: the board could not be read to the end.");
            }
        }
    }

    Ok(())
}
