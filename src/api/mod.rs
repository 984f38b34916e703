//! Remote board API boundary.

pub mod client;
pub mod models;

pub use client::MondayClient;
pub use models::{ItemsPage, RawColumnValue, RawItem};

use crate::errors::ApiError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Column id → encoded column value, as sent in a mutation.
pub type ColumnValues = Map<String, Value>;

/// Operations the synchronizer needs from the board service.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetch one page of items. `cursor` is `None` for the first page.
    async fn items_page(
        &self,
        board_id: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ApiError>;

    /// Create an item and return its remote id.
    async fn create_item(
        &self,
        board_id: &str,
        item_name: &str,
        column_values: &ColumnValues,
    ) -> Result<String, ApiError>;

    /// Overwrite the given columns of an item and return its remote id.
    async fn change_column_values(
        &self,
        board_id: &str,
        item_id: &str,
        column_values: &ColumnValues,
    ) -> Result<String, ApiError>;
}
