//! Unified application error type.
//! All modules (db, core, api, cli) return AppError so that the dispatcher
//! can report every failure the same way.

use std::io;
use thiserror::Error;

/// Errors raised at the remote board API boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Rate limited by remote API: {0}")]
    RateLimited(String),

    #[error("HTTP {status} from remote API: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Unexpected response from remote API: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the caller should back off and retry the same request.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ApiError::RateLimited(_) => true,
            ApiError::Status { status, .. } => *status == 429,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Reporting view error: {0}")]
    Source(String),

    // ---------------------------
    // Remote API
    // ---------------------------
    #[error("Remote API error: {0}")]
    Api(#[from] ApiError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Encoding / mapping errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Value '{label}' of field '{field}' has no option on the board")]
    UnmappedLabel { field: String, label: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    #[error("No board configured for domain '{0}'")]
    MissingBoard(String),

    #[error("No API key configured (set api_key or MONDAY_API_KEY)")]
    MissingApiKey,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
