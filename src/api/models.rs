//! Wire models of the GraphQL envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
    }

    /// Rate and complexity budget errors are reported as GraphQL errors.
    pub fn is_rate_limit(&self) -> bool {
        const CODES: [&str; 4] = [
            "RATE_LIMIT_EXCEEDED",
            "ComplexityException",
            "COMPLEXITY_BUDGET_EXHAUSTED",
            "maxConcurrencyExceeded",
        ];
        if self.code().is_some_and(|c| CODES.contains(&c)) {
            return true;
        }
        let msg = self.message.to_lowercase();
        msg.contains("rate limit") || msg.contains("complexity budget")
    }
}

#[derive(Debug, Deserialize)]
pub struct BoardsData {
    #[serde(default)]
    pub boards: Vec<BoardPage>,
}

#[derive(Debug, Deserialize)]
pub struct BoardPage {
    pub items_page: ItemsPage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<RawColumnValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumnValue {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    /// JSON-encoded value, or null for empty columns.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemData {
    pub create_item: ItemRef,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValuesData {
    pub change_multiple_column_values: ItemRef,
}

#[derive(Debug, Deserialize)]
pub struct ItemRef {
    pub id: String,
}
