//! UI-agnostic state types
//!
//! Plain data shared by the panels, the HTTP client and the renderer. Nothing
//! in here depends on ratatui or on the network.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat message in the conversation sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Set on the assistant entry recorded for a failed request. Never sent.
    #[serde(skip)]
    pub failed: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), failed: false }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Assistant-side entry describing a request that did not get a reply
    pub fn failure(content: impl Into<String>) -> Self {
        Self { failed: true, ..Self::assistant(content) }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Which way a simulator log entry travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
    Error,
}

impl Direction {
    /// Caption shown above the pretty-printed body
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Outbound => "POST /webhooks/line →",
            Direction::Inbound => "← response",
            Direction::Error => "error",
        }
    }
}

/// One entry of the simulator's request/response log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub direction: Direction,
    pub body: Value,
}

impl LogEntry {
    pub fn new(direction: Direction, body: Value) -> Self {
        Self { direction, body }
    }

    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

/// Vertical scroll position of a panel's transcript.
///
/// While `follow` is set the view sticks to the newest line; any update to
/// the transcript re-enables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: u16,
    pub follow: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset: 0, follow: true }
    }
}

impl Viewport {
    pub fn pin_to_bottom(&mut self) {
        self.follow = true;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines);
    }

    /// Clamp against the rendered content and return the offset to draw at
    pub fn resolve(&mut self, total_lines: u16, visible_lines: u16) -> u16 {
        let max = total_lines.saturating_sub(visible_lines);
        if self.follow || self.offset >= max {
            self.offset = max;
            self.follow = true;
        }
        self.offset
    }
}
