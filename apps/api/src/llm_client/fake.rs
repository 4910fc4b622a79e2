//! Fake transport for tests.
//!
//! Replies are matched by checking whether the prompt contains a registered
//! substring. Every call is counted and recorded so tests can assert that
//! validation failures never reach the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{ChatTransport, CredentialMode, TransportError};

#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Api { status: u16, message: String },
    Empty,
}

impl FakeReply {
    fn to_result(&self) -> Result<String, TransportError> {
        match self {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Api { status, message } => Err(TransportError::Api {
                status: *status,
                message: message.clone(),
            }),
            FakeReply::Empty => Err(TransportError::EmptyContent),
        }
    }
}

#[derive(Debug)]
pub struct FakeTransport {
    replies: Vec<(String, FakeReply)>,
    default_reply: FakeReply,
    /// Prompts containing this substring wait for the gate before replying.
    gate: Option<(String, Arc<Notify>)>,
    mode: CredentialMode,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn replying(text: &str) -> Self {
        Self {
            replies: Vec::new(),
            default_reply: FakeReply::Text(text.to_string()),
            gate: None,
            mode: CredentialMode::Direct,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reply: FakeReply) -> Self {
        let mut fake = Self::replying("");
        fake.default_reply = reply;
        fake
    }

    pub fn with_reply(mut self, prompt_contains: &str, reply: FakeReply) -> Self {
        self.replies.push((prompt_contains.to_string(), reply));
        self
    }

    pub fn with_gate(mut self, prompt_contains: &str, gate: Arc<Notify>) -> Self {
        self.gate = Some((prompt_contains.to_string(), gate));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system, prompt) pairs in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));

        if let Some((needle, gate)) = &self.gate {
            if prompt.contains(needle.as_str()) {
                gate.notified().await;
            }
        }

        self.replies
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .unwrap_or(&self.default_reply)
            .to_result()
    }

    fn credential_mode(&self) -> CredentialMode {
        self.mode
    }
}
