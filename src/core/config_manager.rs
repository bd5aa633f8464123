// src/core/config_manager.rs
//! Unified configuration: optional config.yaml per environment, then env overrides

use crate::utils::parse_millis;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub server: ServerSettings,
}

/// Settings the HTTP layer reads from managed state.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub port: u16,
    pub base_url: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub submit_delay: Duration,
    pub detail_delay: Duration,
    pub consent_reprompt_months: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            base_url: "http://localhost:3000".to_string(),
            contact_email: "careers@example.com".to_string(),
            contact_phone: "+1 (555) 010-2030".to_string(),
            submit_delay: Duration::from_millis(2000),
            detail_delay: Duration::from_millis(500),
            consent_reprompt_months: crate::consent::DEFAULT_REPROMPT_MONTHS,
        }
    }
}

impl ServerSettings {
    /// Zero delays, for tests and local tooling.
    pub fn instant() -> Self {
        Self {
            submit_delay: Duration::ZERO,
            detail_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileSettings {
    port: Option<u16>,
    base_url: Option<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    submit_delay_ms: Option<u64>,
    detail_delay_ms: Option<u64>,
    consent_reprompt_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSettings,
    #[serde(default)]
    production: FileSettings,
}

impl ConfigManager {
    /// Load from ./config.yaml (if present) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    pub fn load_with(config_path: &Path, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "local".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut server = ServerSettings::default();

        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            let section = match environment.as_str() {
                "production" => file.production,
                _ => file.local,
            };
            Self::apply_file(&mut server, section);
        }

        Self::apply_env(&mut server, &var)?;
        Ok(Self {
            environment,
            server,
        })
    }

    fn apply_file(server: &mut ServerSettings, file: FileSettings) {
        if let Some(port) = file.port {
            server.port = port;
        }
        if let Some(base_url) = file.base_url {
            server.base_url = base_url;
        }
        if let Some(email) = file.contact_email {
            server.contact_email = email;
        }
        if let Some(phone) = file.contact_phone {
            server.contact_phone = phone;
        }
        if let Some(ms) = file.submit_delay_ms {
            server.submit_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.detail_delay_ms {
            server.detail_delay = Duration::from_millis(ms);
        }
        if let Some(months) = file.consent_reprompt_months {
            server.consent_reprompt_months = months;
        }
    }

    fn apply_env(server: &mut ServerSettings, var: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = var("JOB_BOARD_PORT").or_else(|| var("ROCKET_PORT")) {
            server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("JOB_BOARD_PORT must be a valid port number"))?;
        }
        if let Some(base_url) = var("JOB_BOARD_BASE_URL") {
            server.base_url = base_url;
        }
        if let Some(email) = var("CONTACT_EMAIL") {
            server.contact_email = email;
        }
        if let Some(phone) = var("CONTACT_PHONE") {
            server.contact_phone = phone;
        }
        for (key, slot) in [
            ("SUBMIT_DELAY_MS", &mut server.submit_delay),
            ("DETAIL_DELAY_MS", &mut server.detail_delay),
        ] {
            if let Some(raw) = var(key) {
                match parse_millis(&raw) {
                    Some(delay) => *slot = delay,
                    None => warn!("Ignoring {}={:?}: not a millisecond count", key, raw),
                }
            }
        }
        Ok(())
    }
}
