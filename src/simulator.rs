//! LINE webhook simulator: builds a fake inbound message event, posts it to
//! `/webhooks/line` and keeps a log of what went out and what came back.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{BackendClient, RequestFailure};
use crate::input::InputField;
use crate::state::{Direction, LogEntry, Viewport};

/// Placeholder reply token; the backend cannot actually reply with it
pub const SIMULATED_REPLY_TOKEN: &str = "SIMULATED";
pub const DEFAULT_USER_ID: &str = "UdevUser";
pub const DEFAULT_TEXT: &str = "Hello from LINE dev!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply_token: String,
    pub source: EventSource,
    pub message: TextMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// A single text message event from `user_id`
pub fn build_envelope(user_id: &str, text: &str) -> WebhookEnvelope {
    WebhookEnvelope {
        events: vec![WebhookEvent {
            kind: "message".to_string(),
            reply_token: SIMULATED_REPLY_TOKEN.to_string(),
            source: EventSource {
                kind: "user".to_string(),
                user_id: user_id.to_string(),
            },
            message: TextMessage {
                kind: "text".to_string(),
                text: text.to_string(),
            },
        }],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimField {
    UserId,
    Text,
}

type SimTask = JoinHandle<Result<Value, RequestFailure>>;

pub struct SimulatorPanel {
    pub user_id: InputField,
    pub text: InputField,
    pub focus: SimField,
    pub viewport: Viewport,
    log: Vec<LogEntry>,
    loading: bool,
    in_flight: Option<(WebhookEnvelope, SimTask)>,
}

impl Default for SimulatorPanel {
    fn default() -> Self {
        Self::new(DEFAULT_USER_ID, DEFAULT_TEXT)
    }
}

impl SimulatorPanel {
    pub fn new(user_id: &str, text: &str) -> Self {
        Self {
            user_id: InputField::new(user_id),
            text: InputField::new(text),
            focus: SimField::Text,
            viewport: Viewport::default(),
            log: Vec::new(),
            loading: false,
            in_flight: None,
        }
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SimField::UserId => SimField::Text,
            SimField::Text => SimField::UserId,
        };
    }

    /// The field keystrokes go to. The text field is read-only while a
    /// request is in flight; the user id stays editable.
    pub fn focused_field_mut(&mut self) -> Option<&mut InputField> {
        match self.focus {
            SimField::UserId => Some(&mut self.user_id),
            SimField::Text if self.loading => None,
            SimField::Text => Some(&mut self.text),
        }
    }

    /// Build the envelope for the current fields and mark the panel busy.
    ///
    /// The text field is cleared right away, whatever the outcome. Returns
    /// `None` without touching any state when the text is blank or a request
    /// is already in flight.
    pub fn begin_submit(&mut self) -> Option<WebhookEnvelope> {
        if self.loading || self.text.is_blank() {
            return None;
        }

        let text = self.text.take();
        let envelope = build_envelope(self.user_id.as_str(), &text);
        self.loading = true;
        debug!(user_id = self.user_id.as_str(), "simulated event built");
        Some(envelope)
    }

    /// Log the exchange. Always releases `loading`.
    pub fn complete(&mut self, envelope: WebhookEnvelope, result: Result<Value, RequestFailure>) {
        match result {
            Ok(body) => {
                info!("simulated webhook accepted");
                let outbound = serde_json::to_value(&envelope).unwrap_or(Value::Null);
                self.log.push(LogEntry::new(Direction::Outbound, outbound));
                self.log.push(LogEntry::new(Direction::Inbound, body));
            }
            Err(failure) => {
                warn!(error = %failure, "simulated webhook failed");
                self.log.push(LogEntry::new(
                    Direction::Error,
                    json!({ "error": failure.display_message() }),
                ));
            }
        }
        self.loading = false;
        self.viewport.pin_to_bottom();
    }

    /// Start a request in the background. Returns false if nothing was sent.
    pub fn submit(&mut self, client: &BackendClient) -> bool {
        let Some(envelope) = self.begin_submit() else {
            return false;
        };

        let client = client.clone();
        let payload = envelope.clone();
        let task = tokio::spawn(async move { client.simulate(&payload).await });
        self.in_flight = Some((envelope, task));
        true
    }

    pub async fn poll(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|(_, task)| task.is_finished());
        if finished {
            self.settle().await;
        }
    }

    pub async fn settle(&mut self) {
        if let Some((envelope, task)) = self.in_flight.take() {
            let result = task
                .await
                .unwrap_or_else(|e| Err(RequestFailure::Transport(e.to_string())));
            self.complete(envelope, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_exact_shape() {
        let envelope = build_envelope("U1", "hi");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"events": [{
                "type": "message",
                "replyToken": "SIMULATED",
                "source": {"type": "user", "userId": "U1"},
                "message": {"type": "text", "text": "hi"}
            }]})
        );
    }

    #[test]
    fn defaults_match_dev_fixture() {
        let panel = SimulatorPanel::default();
        assert_eq!(panel.user_id.as_str(), "UdevUser");
        assert_eq!(panel.text.as_str(), "Hello from LINE dev!");
        assert!(panel.log().is_empty());
    }

    #[test]
    fn blank_text_is_noop() {
        let mut panel = SimulatorPanel::new("U1", " \t ");
        assert!(panel.begin_submit().is_none());
        assert!(!panel.is_loading());
        assert_eq!(panel.text.as_str(), " \t ");
    }

    #[test]
    fn text_is_cleared_even_when_request_fails() {
        let mut panel = SimulatorPanel::new("U1", "hi");
        let envelope = panel.begin_submit().unwrap();
        assert!(panel.is_loading());
        assert!(panel.text.as_str().is_empty());
        assert_eq!(panel.user_id.as_str(), "U1");

        panel.complete(envelope, Err(RequestFailure::Transport("Network Error".into())));
        assert!(panel.text.as_str().is_empty());
        assert!(!panel.is_loading());
    }

    #[test]
    fn submit_while_loading_is_noop() {
        let mut panel = SimulatorPanel::new("U1", "hi");
        panel.begin_submit();
        panel.text = InputField::new("again");
        assert!(panel.begin_submit().is_none());
        assert_eq!(panel.text.as_str(), "again");
    }

    #[test]
    fn success_logs_outbound_then_inbound() {
        let mut panel = SimulatorPanel::new("U1", "hi");
        let envelope = panel.begin_submit().unwrap();
        panel.complete(envelope, Ok(json!({"status": "ok"})));

        let log = panel.log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].direction, Direction::Outbound);
        assert_eq!(log[0].body, serde_json::to_value(build_envelope("U1", "hi")).unwrap());
        assert_eq!(log[1], LogEntry::new(Direction::Inbound, json!({"status": "ok"})));
    }

    #[test]
    fn transport_failure_logs_single_error() {
        let mut panel = SimulatorPanel::new("U1", "hi");
        let envelope = panel.begin_submit().unwrap();
        panel.complete(envelope, Err(RequestFailure::Transport("Network Error".into())));

        assert_eq!(
            panel.log(),
            &[LogEntry::new(Direction::Error, json!({"error": "Network Error"}))]
        );
    }

    #[test]
    fn completion_repins_a_scrolled_up_log() {
        let mut panel = SimulatorPanel::new("U1", "hi");
        let envelope = panel.begin_submit().unwrap();
        panel.viewport.resolve(40, 10);
        panel.viewport.scroll_up(15);
        assert!(!panel.viewport.follow);

        panel.complete(envelope, Err(RequestFailure::Transport("Network Error".into())));
        assert!(panel.viewport.follow);
        assert_eq!(panel.viewport.resolve(45, 10), 35);
    }

    #[test]
    fn text_field_locked_while_loading() {
        let mut panel = SimulatorPanel::new("U1", "hi");
        panel.begin_submit();
        assert!(panel.focused_field_mut().is_none());

        panel.toggle_focus();
        assert_eq!(panel.focus, SimField::UserId);
        assert!(panel.focused_field_mut().is_some());
    }
}
