//! File-based `tracing` setup.
//!
//! The terminal belongs to the UI, so events go to a daily-rolling file
//! instead of stderr. Call [`init_logging`] once at startup; later calls are
//! no-ops that return the directory resolved by the first one.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_DIR_ENV: &str = "CHATBOT_LOG_DIR";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the default directory and the file name prefix
    pub app_name: &'static str,
    /// Explicit log directory; otherwise `CHATBOT_LOG_DIR`, then the
    /// platform's local data dir
    pub log_dir: Option<PathBuf>,
    /// Filter applied when `RUST_LOG` is unset
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "chatbot-console",
            log_dir: None,
            default_filter: "info",
        }
    }
}

pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = LOG_DIR.get() {
        return Ok(dir.clone());
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let appender = rolling::daily(&dir, format!("{}.log", config.app_name));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_DIR.set(dir.clone());
    Ok(dir)
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return PathBuf::from(env_dir);
    }

    dirs::data_local_dir()
        .map(|d| d.join(app_name).join("logs"))
        .unwrap_or_else(|| PathBuf::from(".").join(app_name))
}
