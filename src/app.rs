use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::chat::ChatPanel;
use crate::client::{BackendClient, RequestFailure};
use crate::config::Config;
use crate::simulator::SimulatorPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chat,
    Simulator,
}

impl Tab {
    pub fn all() -> [Tab; 2] {
        [Tab::Chat, Tab::Simulator]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Simulator => "LINE Simulator",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Tab::Chat => Tab::Simulator,
            Tab::Simulator => Tab::Chat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Online,
    Offline,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub tab: Tab,
    pub input_mode: InputMode,

    // Panels (each owns its own state and in-flight request)
    pub chat: ChatPanel,
    pub simulator: SimulatorPanel,

    // Backend
    pub client: BackendClient,
    pub backend_status: BackendStatus,
    health_task: Option<JoinHandle<Result<(), RequestFailure>>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(config: &Config) -> Self {
        let client = BackendClient::new(&config.backend_url());
        info!(backend = client.base_url(), "app initialised");

        Self {
            should_quit: false,
            tab: Tab::Chat,
            input_mode: InputMode::Editing,
            chat: ChatPanel::new(config.system_prompt())
                .with_model(config.model.clone(), config.temperature),
            simulator: SimulatorPanel::new(config.simulator_user_id(), config.simulator_text()),
            client,
            backend_status: BackendStatus::Unknown,
            health_task: None,
            animation_frame: 0,
        }
    }

    pub fn toggle_tab(&mut self) {
        self.select_tab(self.tab.toggled());
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            debug!(tab = tab.title(), "switching tab");
            self.tab = tab;
        }
    }

    /// Whether the visible panel has a request in flight
    pub fn is_loading(&self) -> bool {
        match self.tab {
            Tab::Chat => self.chat.is_loading(),
            Tab::Simulator => self.simulator.is_loading(),
        }
    }

    /// Submit the visible panel's form
    pub fn submit(&mut self) -> bool {
        match self.tab {
            Tab::Chat => self.chat.submit(&self.client),
            Tab::Simulator => self.simulator.submit(&self.client),
        }
    }

    /// Kick off a `/health` check unless one is already running
    pub fn check_backend(&mut self) {
        if self.health_task.is_some() {
            return;
        }
        let client = self.client.clone();
        self.health_task = Some(tokio::spawn(async move { client.health().await }));
    }

    /// Complete any finished background requests
    pub async fn poll_requests(&mut self) {
        self.chat.poll().await;
        self.simulator.poll().await;

        if self.health_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.health_task.take() {
                self.backend_status = match task.await {
                    Ok(Ok(())) => BackendStatus::Online,
                    _ => BackendStatus::Offline,
                };
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.tab {
            Tab::Chat => self.chat.viewport.scroll_up(lines),
            Tab::Simulator => self.simulator.viewport.scroll_up(lines),
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        match self.tab {
            Tab::Chat => self.chat.viewport.scroll_down(lines),
            Tab::Simulator => self.simulator.viewport.scroll_down(lines),
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.is_loading() || self.simulator.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputField;
    use crate::state::ChatMessage;
    use serde_json::json;

    fn test_app() -> App {
        App::new(&Config {
            backend_url: Some("http://127.0.0.1:9".into()),
            ..Config::default()
        })
    }

    #[test]
    fn starts_on_chat_tab() {
        let app = test_app();
        assert_eq!(app.tab, Tab::Chat);
        assert!(!app.is_loading());
    }

    #[test]
    fn toggling_preserves_each_panel() {
        let mut app = test_app();
        app.chat.input = InputField::new("hi");
        app.chat.begin_submit();
        app.chat.complete(Ok("hello".into()));

        app.toggle_tab();
        assert_eq!(app.tab, Tab::Simulator);
        let envelope = app.simulator.begin_submit().unwrap();
        app.simulator.complete(envelope, Ok(json!({})));

        app.toggle_tab();
        assert_eq!(app.tab, Tab::Chat);
        let shown: Vec<_> = app.chat.display_messages().cloned().collect();
        assert_eq!(shown, vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")]);
        assert_eq!(app.simulator.log().len(), 2);
    }

    #[test]
    fn loading_flag_follows_visible_panel() {
        let mut app = test_app();
        app.simulator.begin_submit();
        assert!(!app.is_loading());
        app.toggle_tab();
        assert!(app.is_loading());
    }

    #[test]
    fn animation_only_runs_while_loading() {
        let mut app = test_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.chat.input = InputField::new("hi");
        app.chat.begin_submit();
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }
}
