use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::ConsoleError;

pub const DEFAULT_CONFIG_PATH: &str = "config/rca-console.toml";
pub const BASE_URL_ENV: &str = "RCA_API_BASE_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub poll_interval_secs: u64,
    pub page_size: usize,
    pub default_time_range: String,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
            poll_interval_secs: 5,
            page_size: 10,
            default_time_range: "Last 24 hours".to_string(),
            user_agent: format!("rca-console/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConsoleError> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let path = path.map(Path::new).unwrap_or(default_path);

    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path).map_err(|e| ConsoleError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConsoleError::Config(e.to_string()))?
    } else {
        AppConfig::default()
    };

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            cfg.base_url = url;
        }
    }
    validate(&cfg)?;
    Ok(cfg)
}

/// Flag overrides win over file and environment.
pub fn apply_overrides(cfg: AppConfig, base_url: Option<&str>) -> AppConfig {
    match base_url {
        Some(url) => AppConfig {
            base_url: url.to_string(),
            ..cfg
        },
        None => cfg,
    }
}

fn validate(cfg: &AppConfig) -> Result<(), ConsoleError> {
    if cfg.page_size == 0 {
        return Err(ConsoleError::Config("page_size must be at least 1".into()));
    }
    if cfg.poll_interval_secs == 0 {
        return Err(ConsoleError::Config(
            "poll_interval_secs must be at least 1".into(),
        ));
    }
    if !(cfg.base_url.starts_with("http://") || cfg.base_url.starts_with("https://")) {
        return Err(ConsoleError::Config(format!(
            "base_url must be an http(s) URL: {}",
            cfg.base_url
        )));
    }
    Ok(())
}
