use crate::models::Domain;
use clap::{Parser, Subcommand};

/// Command-line interface definition for boardsync
/// Keeps monday.com boards in line with the ERP reporting views
#[derive(Parser)]
#[command(
    name = "boardsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "One-way synchronization of ERP master data (materials, customers) into monday.com boards",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use a configuration file other than ~/.boardsync/boardsync.conf
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        /// Print the current configuration (API key masked)
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Synchronize one domain from its reporting view into its board
    Sync {
        /// Domain to synchronize
        #[arg(value_enum)]
        domain: Domain,

        /// Compute and print the action plan without writing to the board
        #[arg(long = "dry-run", help = "Show what would be created/updated, write nothing")]
        dry_run: bool,
    },

    /// List the items currently on a domain's board
    Items {
        #[arg(value_enum)]
        domain: Domain,

        /// Print the snapshot as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Print the internal log or the synchronization run history
    Log {
        /// Print rows from the internal `log` table
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        /// Print the recorded synchronization runs
        #[arg(long = "runs", help = "Print the synchronization run history")]
        runs: bool,
    },
}
