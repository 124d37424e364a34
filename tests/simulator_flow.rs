mod common;

use chatbot_console::client::BackendClient;
use chatbot_console::simulator::{build_envelope, SimulatorPanel};
use chatbot_console::state::{Direction, LogEntry};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_envelope_and_logs_both_directions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/line"))
        .and(body_json(json!({"events": [{
            "type": "message",
            "replyToken": "SIMULATED",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "text", "text": "hi"}
        }]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let mut panel = SimulatorPanel::new("U1", "hi");

    assert!(panel.submit(&client));
    assert!(panel.is_loading());
    assert!(panel.text.as_str().is_empty());
    panel.settle().await;

    let expected_out = serde_json::to_value(build_envelope("U1", "hi")).unwrap();
    assert_eq!(
        panel.log(),
        &[
            LogEntry::new(Direction::Outbound, expected_out),
            LogEntry::new(Direction::Inbound, json!({"status": "ok"})),
        ]
    );
    assert!(!panel.is_loading());
}

#[tokio::test]
async fn plain_text_response_is_shown_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/line"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let mut panel = SimulatorPanel::new("U1", "hi");
    panel.submit(&client);
    panel.settle().await;

    assert_eq!(panel.log()[1], LogEntry::new(Direction::Inbound, json!("OK")));
}

#[tokio::test]
async fn backend_error_logs_single_error_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/line"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid signature"})))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri());
    let mut panel = SimulatorPanel::new("U1", "hi");
    panel.submit(&client);
    panel.settle().await;

    assert_eq!(
        panel.log(),
        &[LogEntry::new(Direction::Error, json!({"error": "Invalid signature"}))]
    );
    // text was cleared on submit and stays cleared
    assert!(panel.text.as_str().is_empty());
}

#[tokio::test]
async fn unreachable_backend_logs_transport_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = BackendClient::new(&uri);
    let mut panel = SimulatorPanel::new("U1", "hi");
    panel.submit(&client);
    panel.settle().await;

    let log = panel.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].direction, Direction::Error);
    let message = log[0].body["error"].as_str().unwrap();
    assert!(!message.is_empty());
}

#[tokio::test]
async fn simulator_and_chat_state_stay_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/line"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut app = common::app_for(&server.uri());
    app.toggle_tab();
    assert!(app.submit());
    app.simulator.settle().await;
    app.toggle_tab();

    assert_eq!(app.simulator.log().len(), 2);
    assert_eq!(app.chat.messages().len(), 1);
    assert_eq!(app.chat.display_messages().count(), 0);
}
