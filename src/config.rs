use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::chat::DEFAULT_SYSTEM_PROMPT;
use crate::simulator::{DEFAULT_TEXT, DEFAULT_USER_ID};

pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub system_prompt: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub simulator_user_id: Option<String>,
    pub simulator_text: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// `BACKEND_URL` wins, then the config file, then localhost:8000
    pub fn backend_url(&self) -> String {
        Self::resolve_backend_url(std::env::var(BACKEND_URL_ENV).ok(), self.backend_url.as_deref())
    }

    fn resolve_backend_url(env: Option<String>, file: Option<&str>) -> String {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| file.filter(|v| !v.trim().is_empty()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn simulator_user_id(&self) -> &str {
        self.simulator_user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }

    pub fn simulator_text(&self) -> &str {
        self.simulator_text.as_deref().unwrap_or(DEFAULT_TEXT)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chatbot-console").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn env_overrides_file_overrides_default() {
        assert_eq!(
            Config::resolve_backend_url(Some("http://env:1".into()), Some("http://file:2")),
            "http://env:1"
        );
        assert_eq!(
            Config::resolve_backend_url(Some("  ".into()), Some("http://file:2")),
            "http://file:2"
        );
        assert_eq!(Config::resolve_backend_url(None, None), "http://localhost:8000");
    }

    #[test]
    fn blank_file_url_falls_back_to_default() {
        assert_eq!(Config::resolve_backend_url(None, Some("")), "http://localhost:8000");
        assert_eq!(Config::resolve_backend_url(None, Some(" \t")), "http://localhost:8000");
        assert_eq!(
            Config::resolve_backend_url(Some("".into()), Some("  ")),
            "http://localhost:8000"
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.system_prompt(), "You are a helpful assistant.");
        assert_eq!(config.simulator_user_id(), "UdevUser");
    }

    #[test]
    fn full_file_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        let config = Config {
            backend_url: Some("http://127.0.0.1:9000".into()),
            model: Some("gpt-4o-mini".into()),
            ..Config::default()
        };

        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"simulator_user_id": "U42"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.simulator_user_id(), "U42");
        assert_eq!(config.backend_url, None);
    }
}
