//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! Pipelines talk to a `ChatTransport`; `LlmClient` is the production one.
//!
//! Model: gpt-5-nano (hardcoded, not configurable)
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PipelineConfig;

#[cfg(test)]
pub(crate) mod fake;

pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Same-origin relay path served by `bartender-relay`.
pub const RELAY_PATH: &str = "/api/openai";
pub const DEFAULT_RELAY_URL: &str = "http://localhost:8080/api/openai";
/// The model used for all recipe calls.
pub const MODEL: &str = "gpt-5-nano";
const TEMPERATURE: Option<f32> = Some(1.0);

/// How the bearer credential reaches the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// The caller attaches `Authorization: Bearer <key>` itself.
    Direct,
    /// The dev relay injects the header; the caller never sees the key.
    Relay,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no API key configured for direct mode")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unreadable completion payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no content returned")]
    EmptyContent,
}

/// Sends one system + user exchange and returns the assistant's raw text.
///
/// Exactly one attempt per call. Implementations must not retry.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, TransportError>;

    fn credential_mode(&self) -> CredentialMode;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletion {
    /// Text of the first choice, if it has any.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Remediation text for a 401, depending on who holds the key.
pub fn unauthorized_message(mode: CredentialMode) -> &'static str {
    match mode {
        CredentialMode::Direct => {
            "Missing or invalid client API key. Set BARTENDER_API_KEY or use the dev relay."
        }
        CredentialMode::Relay => {
            "Missing or invalid server API key. Set OPENAI_API_KEY for the dev relay."
        }
    }
}

/// Chat-completion client used by every pipeline.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    url: String,
    mode: CredentialMode,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: &PipelineConfig) -> Self {
        let mode = config.credential_mode();
        let (url, api_key) = match mode {
            CredentialMode::Direct => (
                config.endpoint.clone(),
                config.trimmed_credential().map(str::to_string),
            ),
            CredentialMode::Relay => (config.relay_url.clone(), None),
        };

        Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("Failed to build HTTP client"),
            url,
            mode,
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatTransport for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, TransportError> {
        let mut request = self.client.post(&self.url);
        if self.mode == CredentialMode::Direct {
            let key = self
                .api_key
                .as_deref()
                .ok_or(TransportError::MissingCredential)?;
            request = request.bearer_auth(key);
        }

        let body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        // .json() also sets content-type: application/json
        let response = request.json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, body);
            return Err(api_error(status, &body, self.mode));
        }

        let text = response.text().await?;
        debug!("Completion call succeeded: {} bytes", text.len());

        let completion: ChatCompletion = serde_json::from_str(&text)?;
        completion.into_text().ok_or(TransportError::EmptyContent)
    }

    fn credential_mode(&self) -> CredentialMode {
        self.mode
    }
}

/// Builds the error for a non-2xx response.
fn api_error(status: StatusCode, body: &str, mode: CredentialMode) -> TransportError {
    let message = if status == StatusCode::UNAUTHORIZED {
        unauthorized_message(mode).to_string()
    } else {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("OpenAI request failed ({})", status.as_u16()))
    };

    TransportError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
