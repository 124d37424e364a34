//! Chat panel: the conversation sent to `/api/chat` and its input box.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::{BackendClient, ChatRequest, RequestFailure};
use crate::input::InputField;
use crate::state::{ChatMessage, ChatRole, Viewport};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

type ChatTask = JoinHandle<Result<String, RequestFailure>>;

pub struct ChatPanel {
    messages: Vec<ChatMessage>,
    pub input: InputField,
    pub viewport: Viewport,
    loading: bool,
    task: Option<ChatTask>,
    model: Option<String>,
    temperature: Option<f32>,
}

impl ChatPanel {
    /// The system prompt stays first in the history for the whole session
    pub fn new(system_prompt: &str) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
            input: InputField::default(),
            viewport: Viewport::default(),
            loading: false,
            task: None,
            model: None,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>, temperature: Option<f32>) -> Self {
        self.model = model;
        self.temperature = temperature;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Everything except system messages
    pub fn display_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != ChatRole::System)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record the user's message and build the request for it.
    ///
    /// Returns `None` without touching any state when the input is blank or a
    /// request is already in flight.
    pub fn begin_submit(&mut self) -> Option<ChatRequest> {
        if self.loading || self.input.is_blank() {
            return None;
        }

        let content = self.input.take();
        self.messages.push(ChatMessage::user(content));
        self.loading = true;
        self.viewport.pin_to_bottom();

        Some(ChatRequest {
            messages: self.messages.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
        })
    }

    /// Finish an exchange. Always releases `loading`.
    pub fn complete(&mut self, result: Result<String, RequestFailure>) {
        match result {
            Ok(reply) => {
                info!(chars = reply.chars().count(), "chat exchange finished");
                self.messages.push(ChatMessage::assistant(reply));
            }
            Err(failure) => {
                warn!(error = %failure, "chat exchange failed");
                self.messages.push(ChatMessage::failure(format!(
                    "Error: {}",
                    failure.display_message()
                )));
            }
        }
        self.loading = false;
        self.viewport.pin_to_bottom();
    }

    /// Start a request in the background. Returns false if nothing was sent.
    pub fn submit(&mut self, client: &BackendClient) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };

        let client = client.clone();
        self.task = Some(tokio::spawn(async move { client.chat(&request).await }));
        true
    }

    /// Complete the exchange if its task has finished; never blocks
    pub async fn poll(&mut self) {
        if self.task.as_ref().is_some_and(|t| t.is_finished()) {
            self.settle().await;
        }
    }

    /// Wait for the in-flight request (if any) and complete it
    pub async fn settle(&mut self) {
        if let Some(task) = self.task.take() {
            let result = task
                .await
                .unwrap_or_else(|e| Err(RequestFailure::Transport(e.to_string())));
            self.complete(result);
        }
    }
}
