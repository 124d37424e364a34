use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use chatbot_console::app::App;
use chatbot_console::config::Config;
use chatbot_console::logging::{self, LogConfig};
use chatbot_console::{handler, tui, ui};

/// Also how often finished requests get picked up
const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let log_dir = logging::init_logging(LogConfig::default())?;
    info!(log_dir = %log_dir.display(), "starting chatbot console");

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not load config, using defaults");
        Config::default()
    });

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &config).await;
    tui::restore()?;

    if let Err(e) = &result {
        error!(error = %e, "exited with error");
    }
    result
}

async fn run(terminal: &mut tui::Tui, config: &Config) -> Result<()> {
    let mut app = App::new(config);
    app.check_backend();

    let mut events = tui::EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }
    }

    info!("shutting down");
    Ok(())
}
