use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "expense.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub user_email: Option<String>,
    pub log_filter: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5678".into(),
            user_email: None,
            log_filter: "info".into(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    user_email: Option<String>,
    log_filter: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it exists, then environment variables.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if file_cfg.user_email.is_some() {
            settings.user_email = file_cfg.user_email;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("EXPENSE_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("EXPENSE_USER_EMAIL") {
        settings.user_email = Some(v);
    }
    if let Some(v) = env("APP__USER_EMAIL") {
        settings.user_email = Some(v);
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_filter = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings.api_url = normalize_api_url(&settings.api_url);
    settings.user_email = settings
        .user_email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());
    Ok(settings)
}

pub fn normalize_api_url(raw_api_url: &str) -> String {
    let trimmed = raw_api_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().api_url;
    }
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
