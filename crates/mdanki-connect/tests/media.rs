//! Tests for media and misc actions.

mod common;

use common::{client_for_mock, mock_action, mock_anki_response, setup_mock_server};
use mdanki_connect::{AnkiClient, Error, StoreMediaParams};
use wiremock::matchers::{body_partial_json, method};
use wiremock::Mock;

#[tokio::test]
async fn test_store_media_from_base64() {
    let server = setup_mock_server().await;
    let client = client_for_mock(&server);

    mock_action(&server, "storeMediaFile", mock_anki_response("abc.png")).await;

    let params = StoreMediaParams::from_base64("abc.png", "SGVsbG8gV29ybGQ=");
    let result = client.media().store(params).await.unwrap();
    assert_eq!(result, "abc.png");
}

#[tokio::test]
async fn test_store_many_uses_one_multi_request() {
    let server = setup_mock_server().await;
    let client = client_for_mock(&server);

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": "multi",
            "params": {"actions": [
                {"action": "storeMediaFile", "params": {"filename": "a.png", "data": "QQ=="}},
                {"action": "storeMediaFile", "params": {"filename": "b.png", "data": "Qg=="}}
            ]}
        })))
        .respond_with(mock_anki_response(serde_json::json!([
            {"result": "a.png", "error": null},
            {"result": "b.png", "error": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let files = vec![
        StoreMediaParams::from_base64("a.png", "QQ=="),
        StoreMediaParams::from_base64("b.png", "Qg=="),
    ];
    let results = client.media().store_many(&files).await.unwrap();
    assert_eq!(results, vec![serde_json::json!("a.png"), serde_json::json!("b.png")]);
}

#[tokio::test]
async fn test_store_many_surfaces_sub_action_error() {
    let server = setup_mock_server().await;
    let client = client_for_mock(&server);

    mock_action(
        &server,
        "multi",
        mock_anki_response(serde_json::json!([
            {"result": null, "error": "media folder is read-only"}
        ])),
    )
    .await;

    let files = vec![StoreMediaParams::from_base64("a.png", "QQ==")];
    let err = client.media().store_many(&files).await.unwrap_err();
    assert!(matches!(err, Error::AnkiConnect(msg) if msg == "media folder is read-only"));
}

#[tokio::test]
async fn test_version_and_sync() {
    let server = setup_mock_server().await;
    let client = client_for_mock(&server);

    mock_action(&server, "version", mock_anki_response(6)).await;
    mock_action(&server, "sync", mock_anki_response(serde_json::Value::Null)).await;

    assert_eq!(client.misc().version().await.unwrap(), 6);
    client.misc().sync().await.unwrap();
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on port 9 on a test machine.
    let client = AnkiClient::builder().url("http://127.0.0.1:9").build();
    let err = client.misc().version().await.unwrap_err();
    assert!(matches!(err, Error::ConnectionRefused | Error::Http(_)));
}
