use crate::errors::{AppError, AppResult};
use crate::models::Domain;
use crate::models::domain::{CUSTOMERS_VIEW, MATERIALS_VIEW};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub boards: BoardsConfig,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,
    #[serde(default = "default_max_rate_limit_retries")]
    pub max_rate_limit_retries: u32,
    #[serde(default = "default_write_delay_ms")]
    pub write_delay_ms: u64,
    #[serde(default = "default_db_timeout_secs")]
    pub db_timeout_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub notify_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardsConfig {
    #[serde(default)]
    pub materials: String,
    #[serde(default)]
    pub customers: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_materials_view")]
    pub materials: String,
    #[serde(default = "default_customers_view")]
    pub customers: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            materials: default_materials_view(),
            customers: default_customers_view(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_api_version() -> String {
    "2024-10".to_string()
}
fn default_page_size() -> u32 {
    500
}
fn default_page_delay_ms() -> u64 {
    1000
}
fn default_rate_limit_backoff_ms() -> u64 {
    5000
}
fn default_max_rate_limit_retries() -> u32 {
    5
}
fn default_write_delay_ms() -> u64 {
    200
}
fn default_db_timeout_secs() -> u64 {
    60
}
fn default_http_timeout_secs() -> u64 {
    30
}
fn default_materials_view() -> String {
    MATERIALS_VIEW.to_string()
}
fn default_customers_view() -> String {
    CUSTOMERS_VIEW.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            api_url: default_api_url(),
            api_key: String::new(),
            api_version: default_api_version(),
            boards: BoardsConfig::default(),
            views: ViewsConfig::default(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
            write_delay_ms: default_write_delay_ms(),
            db_timeout_secs: default_db_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            notify_to: None,
        }
    }

    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".boardsync")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("boardsync.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("boardsync.sqlite")
    }

    /// Load configuration from `path`, or defaults if the file is missing.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the file and apply environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let default_path = Self::config_file();
        let mut cfg = Self::load_from(path.unwrap_or(&default_path))?;
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Apply environment-style overrides; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("MONDAY_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = get("BOARDSYNC_DATABASE") {
            self.database = v;
        }
        if let Some(v) = get("BOARDSYNC_MATERIALS_BOARD") {
            self.boards.materials = v;
        }
        if let Some(v) = get("BOARDSYNC_CUSTOMERS_BOARD") {
            self.boards.customers = v;
        }
        if let Some(v) = get("BOARDSYNC_NOTIFY_TO") {
            self.notify_to = Some(v);
        }
    }

    pub fn board_for(&self, domain: Domain) -> AppResult<&str> {
        let id = match domain {
            Domain::Materials => self.boards.materials.trim(),
            Domain::Customers => self.boards.customers.trim(),
        };
        if id.is_empty() {
            Err(AppError::MissingBoard(domain.to_string()))
        } else {
            Ok(id)
        }
    }

    pub fn view_for(&self, domain: Domain) -> &str {
        match domain {
            Domain::Materials => &self.views.materials,
            Domain::Customers => &self.views.customers,
        }
    }

    /// YAML rendering with the API key masked.
    pub fn to_masked_yaml(&self) -> AppResult<String> {
        let mut shown = self.clone();
        if !shown.api_key.is_empty() {
            let tail: String = shown
                .api_key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            shown.api_key = format!("****{tail}");
        }
        serde_yaml::to_string(&shown).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files
    pub fn init_all(
        custom_db: Option<String>,
        config_path: Option<&Path>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();
        let conf_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_file);

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::with_database(db_path.clone());

        if !is_test {
            if let Some(parent) = conf_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(&conf_path)?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", conf_path);
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
