//! Configuration loading and validation.

use crate::error::{DigestError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHANNEL: &str = "#general";
pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_GITINSPECTOR: &str = "gitinspector";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration. File values are overridden by environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub llm_model: String,
    pub slack_token: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub slack_channel: String,
    pub time_window_days: u32,
    pub gitinspector_path: String,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            slack_token: None,
            slack_webhook_url: None,
            slack_channel: DEFAULT_CHANNEL.to_string(),
            time_window_days: DEFAULT_WINDOW_DAYS,
            gitinspector_path: DEFAULT_GITINSPECTOR.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Default config file: ~/.config/gitdigest/config.toml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("gitdigest")
            .join("config.toml")
    }

    /// Loads the file at `path` (or the default path if it exists), then
    /// applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DigestError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Overrides fields from environment-style variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.openai_base_url = v;
        }
        if let Some(v) = get("LLM_MODEL") {
            self.llm_model = v;
        }
        if let Some(v) = get("SLACK_TOKEN") {
            self.slack_token = Some(v);
        }
        if let Some(v) = get("SLACK_WEBHOOK_URL") {
            self.slack_webhook_url = Some(v);
        }
        if let Some(v) = get("SLACK_CHANNEL") {
            self.slack_channel = v;
        }
        if let Some(v) = get("TIME_WINDOW_DAYS") {
            self.time_window_days = v
                .trim()
                .parse()
                .map_err(|_| {
                    DigestError::Config(format!("TIME_WINDOW_DAYS is not a number: {v}"))
                })?;
        }
        if let Some(v) = get("GITINSPECTOR_PATH") {
            self.gitinspector_path = v;
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = v
                .trim()
                .parse()
                .map_err(|_| {
                    DigestError::Config(format!("HTTP_TIMEOUT_SECS is not a number: {v}"))
                })?;
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn require_llm(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| DigestError::Config("OPENAI_API_KEY is not set".to_string()))
    }

    pub fn require_slack(&self) -> Result<()> {
        if self.slack_token.is_none() && self.slack_webhook_url.is_none() {
            return Err(DigestError::Config(
                "Either SLACK_TOKEN or SLACK_WEBHOOK_URL must be provided".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a path cannot be analyzed, if it cannot.
pub fn repository_problem(path: &Path) -> Option<&'static str> {
    if !path.exists() {
        Some("Path does not exist")
    } else if !path.join(".git").exists() {
        Some("Not a Git repository")
    } else {
        None
    }
}

pub fn validate_repositories(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Err(DigestError::Config("No repository paths given".to_string()));
    }
    for path in paths {
        if let Some(problem) = repository_problem(path) {
            return Err(DigestError::Config(format!("{problem}: {}", path.display())));
        }
    }
    Ok(())
}
