pub mod app;
pub mod chat;
pub mod client;
pub mod config;
pub mod handler;
pub mod input;
pub mod logging;
pub mod simulator;
pub mod state;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, InputMode, Tab};
pub use chat::ChatPanel;
pub use client::{describe_failure, BackendClient, ChatRequest, RequestFailure};
pub use config::Config;
pub use simulator::{build_envelope, SimulatorPanel, WebhookEnvelope};
pub use state::{ChatMessage, ChatRole, Direction, LogEntry};
