//! Common test utilities for document sync tests.

use mdanki::{AnkiClient, Sender, Settings};
use serde::Serialize;
use serde_json::Value;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

/// Start a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create a sender whose client points at the mock server.
pub fn sender_for_mock(server: &MockServer, settings: Settings) -> Sender<AnkiClient> {
    let client = AnkiClient::builder().url(server.uri()).build();
    Sender::new(client, settings)
}

/// Create a successful AnkiConnect response.
pub fn mock_anki_response<T: Serialize>(result: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": result,
        "error": null
    }))
}

/// Create an error AnkiConnect response.
#[allow(dead_code)] // Not all test files use this
pub fn mock_anki_error(error: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": null,
        "error": error
    }))
}

/// Mount a mock for a specific action (expect exactly 1 call).
pub async fn mock_action(server: &MockServer, action: &str, response: ResponseTemplate) {
    mock_action_times(server, action, response, 1).await;
}

/// Mount a mock for a specific action with expected call count.
pub async fn mock_action_times(
    server: &MockServer,
    action: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": action,
            "version": 6
        })))
        .respond_with(response)
        .expect(Times::from(times))
        .mount(server)
        .await;
}

/// Mount a mock that answers only the first call to an action.
#[allow(dead_code)]
pub async fn mock_action_once(server: &MockServer, action: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({ "action": action })))
        .respond_with(response)
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

/// Action names of every request the server saw, in order.
pub async fn received_actions(server: &MockServer) -> Vec<String> {
    received_bodies(server)
        .await
        .iter()
        .filter_map(|body| body["action"].as_str().map(String::from))
        .collect()
}

/// Params of every request for one action, in order.
#[allow(dead_code)]
pub async fn received_params(server: &MockServer, action: &str) -> Vec<Value> {
    received_bodies(server)
        .await
        .into_iter()
        .filter(|body| body["action"] == action)
        .map(|body| body["params"].clone())
        .collect()
}

async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| request.body_json::<Value>().ok())
        .collect()
}
