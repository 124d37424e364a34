use std::time::Duration;

use chatbot_console::app::{App, BackendStatus};
use chatbot_console::config::Config;

pub fn app_for(backend_url: &str) -> App {
    App::new(&Config {
        backend_url: Some(backend_url.to_string()),
        ..Config::default()
    })
}

/// Poll until the health check has resolved
#[allow(dead_code)]
pub async fn wait_for_status(app: &mut App) -> BackendStatus {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            app.poll_requests().await;
            if app.backend_status != BackendStatus::Unknown {
                return app.backend_status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("health check did not finish")
}
