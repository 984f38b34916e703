use super::models::{
    BoardsData, ChangeValuesData, CreateItemData, GraphQlError, GraphQlResponse, ItemsPage,
};
use super::{BoardApi, ColumnValues};
use crate::config::Config;
use crate::errors::{ApiError, AppError, AppResult};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error};

const ITEMS_PAGE_QUERY: &str = r#"
query ($board: [ID!], $limit: Int!, $cursor: String) {
  boards(ids: $board) {
    items_page(limit: $limit, cursor: $cursor) {
      cursor
      items {
        id
        name
        column_values { id text value }
      }
    }
  }
}"#;

const CREATE_ITEM_MUTATION: &str = r#"
mutation ($board: ID!, $name: String!, $values: JSON!) {
  create_item(board_id: $board, item_name: $name, column_values: $values) { id }
}"#;

const CHANGE_VALUES_MUTATION: &str = r#"
mutation ($board: ID!, $item: ID!, $values: JSON!) {
  change_multiple_column_values(board_id: $board, item_id: $item, column_values: $values) { id }
}"#;

/// Error bodies longer than this are truncated in messages.
const MAX_BODY_IN_ERROR: usize = 500;

/// GraphQL client for the monday.com v2 endpoint.
pub struct MondayClient {
    url: String,
    client: reqwest::Client,
}

impl MondayClient {
    pub fn new(url: &str, api_key: &str, api_version: &str, timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(api_key)
                .map_err(|_| AppError::Config("API key is not a valid header value".into()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !api_version.is_empty() {
            headers.insert(
                "API-Version",
                HeaderValue::from_str(api_version)
                    .map_err(|_| AppError::Config(format!("Invalid api_version '{api_version}'")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("boardsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        if cfg.api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        Self::new(
            &cfg.api_url,
            cfg.api_key.trim(),
            &cfg.api_version,
            Duration::from_secs(cfg.http_timeout_secs),
        )
    }

    /// POST one GraphQL document and unwrap the `data` member.
    ///
    /// A non-empty `errors` array fails the call even on HTTP 200.
    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, ApiError> {
        let body = json!({ "query": query, "variables": variables });

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.as_u16() == 429 {
            return Err(ApiError::RateLimited(truncate(&text)));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&text),
            });
        }

        let envelope: GraphQlResponse<T> = serde_json::from_str(&text)
            .map_err(|e| ApiError::Decode(format!("{e}: {}", truncate(&text))))?;

        if !envelope.errors.is_empty() {
            return Err(classify_errors(&envelope.errors));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response has neither data nor errors".into()))
    }
}

fn classify_errors(errors: &[GraphQlError]) -> ApiError {
    let message = errors
        .iter()
        .map(|e| match e.code() {
            Some(code) => format!("{} ({code})", e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");

    if errors.iter().any(GraphQlError::is_rate_limit) {
        ApiError::RateLimited(message)
    } else {
        error!(errors = %message, "GraphQL call returned errors");
        ApiError::GraphQl(message)
    }
}

fn truncate(body: &str) -> String {
    if body.len() > MAX_BODY_IN_ERROR {
        let cut: String = body.chars().take(MAX_BODY_IN_ERROR).collect();
        format!("{cut}... (truncated)")
    } else {
        body.to_string()
    }
}

#[async_trait]
impl BoardApi for MondayClient {
    async fn items_page(
        &self,
        board_id: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ApiError> {
        debug!(board_id, limit, cursor, "requesting items page");
        let data: BoardsData = self
            .execute(
                ITEMS_PAGE_QUERY,
                json!({ "board": [board_id], "limit": limit, "cursor": cursor }),
            )
            .await?;

        data.boards
            .into_iter()
            .next()
            .map(|b| b.items_page)
            .ok_or_else(|| ApiError::Decode(format!("board {board_id} not found")))
    }

    async fn create_item(
        &self,
        board_id: &str,
        item_name: &str,
        column_values: &ColumnValues,
    ) -> Result<String, ApiError> {
        let values = serde_json::to_string(column_values)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let data: CreateItemData = self
            .execute(
                CREATE_ITEM_MUTATION,
                json!({ "board": board_id, "name": item_name, "values": values }),
            )
            .await?;
        Ok(data.create_item.id)
    }

    async fn change_column_values(
        &self,
        board_id: &str,
        item_id: &str,
        column_values: &ColumnValues,
    ) -> Result<String, ApiError> {
        let values = serde_json::to_string(column_values)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let data: ChangeValuesData = self
            .execute(
                CHANGE_VALUES_MUTATION,
                json!({ "board": board_id, "item": item_id, "values": values }),
            )
            .await?;
        Ok(data.change_multiple_column_values.id)
    }
}
