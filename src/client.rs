//! HTTP client for the chatbot backend.
//!
//! Three endpoints are used: `POST /api/chat`, `POST /webhooks/line` and
//! `GET /health`. No timeout or retry is configured here; a request always
//! resolves to either a body or a [`RequestFailure`].

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::simulator::WebhookEnvelope;
use crate::state::ChatMessage;

/// Anything that went wrong between submitting and getting a usable body
#[derive(Debug, Error, PartialEq)]
pub enum RequestFailure {
    /// Connection refused, DNS failure, aborted task and the like
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response; `body` holds whatever the backend sent back
    #[error("Request failed with status code {}", .status.as_u16())]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },
    /// 2xx response whose body did not have the expected shape
    #[error("{0}")]
    Decode(String),
}

impl RequestFailure {
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestFailure::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Human-readable text for display inside a panel
    pub fn display_message(&self) -> String {
        describe_failure(self.body(), &self.to_string())
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestFailure::Decode(err.to_string())
        } else {
            RequestFailure::Transport(err.to_string())
        }
    }
}

/// Pick the most useful error text: the body's `detail` field, else the
/// transport message, else the literal `"Error"`.
pub fn describe_failure(body: Option<&Value>, message: &str) -> String {
    let detail = body
        .and_then(|b| b.get("detail"))
        .and_then(|detail| match detail {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

    detail
        .or_else(|| (!message.is_empty()).then(|| message.to_string()))
        .unwrap_or_else(|| "Error".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<String, RequestFailure> {
        let url = self.url("/api/chat");
        info!(%url, messages = request.messages.len(), "sending chat request");

        let response = self.client.post(&url).json(request).send().await?;
        let body = read_body(response).await?;

        let parsed: ChatResponse = serde_json::from_value(body)
            .map_err(|e| RequestFailure::Decode(format!("unexpected chat response: {e}")))?;
        debug!(chars = parsed.reply.chars().count(), "chat reply received");
        Ok(parsed.reply)
    }

    pub async fn simulate(&self, envelope: &WebhookEnvelope) -> Result<Value, RequestFailure> {
        let url = self.url("/webhooks/line");
        info!(%url, events = envelope.events.len(), "posting simulated webhook");

        let response = self.client.post(&url).json(envelope).send().await?;
        read_body(response).await
    }

    pub async fn health(&self) -> Result<(), RequestFailure> {
        let url = self.url("/health");
        let response = self.client.get(&url).send().await?;
        read_body(response).await.map(|_| ())
    }
}

/// Read the body as JSON, falling back to a JSON string for non-JSON text.
/// Non-2xx statuses become [`RequestFailure::Status`] carrying that body.
async fn read_body(response: reqwest::Response) -> Result<Value, RequestFailure> {
    let status = response.status();
    let text = response.text().await?;
    let body = parse_body(&text);

    if !status.is_success() {
        warn!(status = status.as_u16(), "backend returned an error status");
        return Err(RequestFailure::Status { status, body });
    }

    Ok(body.unwrap_or(Value::Null))
}

fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
