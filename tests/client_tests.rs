use boardsync::api::{BoardApi, ColumnValues, MondayClient};
use boardsync::config::Config;
use boardsync::errors::{ApiError, AppError};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn client(url: &str) -> MondayClient {
    MondayClient::new(url, "secret-token", "2024-10", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_items_page_is_parsed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("authorization", "secret-token")
        .match_header("api-version", "2024-10")
        .match_body(Matcher::PartialJson(json!({
            "variables": { "board": ["42"], "limit": 500, "cursor": null }
        })))
        .with_status(200)
        .with_body(
            json!({
                "data": { "boards": [ { "items_page": {
                    "cursor": "next-1",
                    "items": [ {
                        "id": "101",
                        "name": "3000001",
                        "column_values": [
                            { "id": "color_mkpvaacs", "text": "KG", "value": "{\"index\":1}" },
                            { "id": "text_mkpvpe8r", "text": null, "value": null }
                        ]
                    } ]
                } } ] }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = client(&server.url()).items_page("42", 500, None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.cursor.as_deref(), Some("next-1"));
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "3000001");
    assert_eq!(page.items[0].column_values[0].value.as_deref(), Some("{\"index\":1}"));
    assert_eq!(page.items[0].column_values[1].text, None);
}

#[tokio::test]
async fn test_http_429_is_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(429)
        .with_body("Too many requests")
        .create_async()
        .await;

    let err = client(&server.url())
        .items_page("42", 500, Some("c1"))
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(500)
        .with_body("internal failure")
        .create_async()
        .await;

    let err = client(&server.url()).items_page("42", 500, None).await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal failure");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_errors_envelope_fails_even_on_http_200() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"errors":[{"message":"Column not found","extensions":{"code":"InvalidColumnIdException"}}]}"#)
        .create_async()
        .await;

    let mut values = ColumnValues::new();
    values.insert("bogus".into(), json!("x"));
    let err = client(&server.url())
        .change_column_values("42", "101", &values)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::GraphQl(ref m) if m.contains("Column not found")));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_complexity_budget_error_is_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"errors":[{"message":"Complexity budget exhausted","extensions":{"code":"COMPLEXITY_BUDGET_EXHAUSTED"}}]}"#)
        .create_async()
        .await;

    let err = client(&server.url()).items_page("42", 500, None).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_create_item_sends_encoded_values_and_returns_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "variables": {
                "board": "42",
                "name": "3000002",
                "values": "{\"color_mkpvaacs\":{\"index\":1}}"
            }
        })))
        .with_status(200)
        .with_body(r#"{"data":{"create_item":{"id":"777"}}}"#)
        .create_async()
        .await;

    let mut values = ColumnValues::new();
    values.insert("color_mkpvaacs".into(), json!({ "index": 1 }));
    let id = client(&server.url())
        .create_item("42", "3000002", &values)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(id, "777");
}

#[tokio::test]
async fn test_unknown_board_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"data":{"boards":[]}}"#)
        .create_async()
        .await;

    let err = client(&server.url()).items_page("404", 500, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn test_client_requires_api_key() {
    let cfg = Config::default();
    assert!(matches!(
        MondayClient::from_config(&cfg),
        Err(AppError::MissingApiKey)
    ));
}
