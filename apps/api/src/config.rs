use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{CredentialMode, DEFAULT_RELAY_URL, OPENAI_CHAT_COMPLETIONS_URL};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Relay server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side credential injected into relayed requests. Optional: without
    /// it requests are forwarded unauthenticated and upstream answers 401.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Full upstream URL that relayed requests are rewritten to.
    pub fn upstream_url(&self) -> String {
        format!("{}/v1/chat/completions", self.openai_base_url)
    }
}

/// Explicit configuration for a recipe pipeline, injected once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bearer token for direct mode. Ignored when `relay` is set.
    pub credential: Option<String>,
    /// Route calls through the same-origin dev relay instead of the API.
    pub relay: bool,
    pub endpoint: String,
    pub relay_url: String,
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            credential: None,
            relay: false,
            endpoint: OPENAI_CHAT_COMPLETIONS_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PipelineConfig {
    pub fn direct(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            ..Self::default()
        }
    }

    pub fn relayed(relay_url: impl Into<String>) -> Self {
        Self {
            relay: true,
            relay_url: relay_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let relay = match optional_env("BARTENDER_USE_RELAY") {
            Some(v) => parse_bool(&v)
                .with_context(|| format!("BARTENDER_USE_RELAY must be a boolean, got '{v}'"))?,
            None => false,
        };
        let request_timeout = match optional_env("BARTENDER_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse::<u64>()
                    .context("BARTENDER_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.request_timeout,
        };

        Ok(PipelineConfig {
            credential: optional_env("BARTENDER_API_KEY"),
            relay,
            endpoint: optional_env("BARTENDER_ENDPOINT").unwrap_or(defaults.endpoint),
            relay_url: optional_env("BARTENDER_RELAY_URL").unwrap_or(defaults.relay_url),
            request_timeout,
        })
    }

    pub fn credential_mode(&self) -> CredentialMode {
        if self.relay {
            CredentialMode::Relay
        } else {
            CredentialMode::Direct
        }
    }

    /// The trimmed credential, or `None` when unset or blank.
    pub fn trimmed_credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Reads an env var, treating unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
