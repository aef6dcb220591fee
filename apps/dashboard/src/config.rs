use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            username: None,
            password: None,
            request_timeout_seconds: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    request_timeout_seconds: Option<u64>,
}

/// Defaults, then the optional TOML file at `path`, then the environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings.base_url = normalize_base_url(&settings.base_url);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.username {
        settings.username = Some(v);
    }
    if let Some(v) = file_cfg.password {
        settings.password = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_seconds {
        settings.request_timeout_seconds = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DHIS2_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("DHIS2_USERNAME") {
        settings.username = Some(v);
    }
    if let Some(v) = lookup("APP__USERNAME") {
        settings.username = Some(v);
    }

    if let Some(v) = lookup("DHIS2_PASSWORD") {
        settings.password = Some(v);
    }
    if let Some(v) = lookup("APP__PASSWORD") {
        settings.password = Some(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }
}

/// Accepts instance roots with or without scheme, trailing slashes or a
/// trailing `/api` segment.
pub fn normalize_base_url(raw_base_url: &str) -> String {
    let raw_base_url = raw_base_url.trim();

    if raw_base_url.is_empty() {
        return Settings::default().base_url;
    }

    let mut base_url = if raw_base_url.contains("://") {
        raw_base_url.to_string()
    } else {
        format!("http://{raw_base_url}")
    };

    while base_url.ends_with('/') {
        base_url.pop();
    }
    if let Some(stripped) = base_url.strip_suffix("/api") {
        base_url = stripped.to_string();
    }
    base_url
}
