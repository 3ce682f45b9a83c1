//! Scripted `LlmProvider` for unit and route tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;

use crate::config::Config;

use super::{ChatMessage, Completion, CompletionOptions, LlmError, LlmProvider, Usage};

pub const MOCK_MODEL: &str = "mock/model";

/// Client settings for tests that exercise the real `LlmClient`.
pub fn client_config(api_key: Option<&str>, base_url: &str, timeout_secs: u64) -> Config {
    Config {
        openrouter_api_key: api_key.map(str::to_string),
        openrouter_base_url: base_url.to_string(),
        default_model: "test/model".to_string(),
        llm_timeout_secs: timeout_secs,
        app_url: "http://localhost:8000".to_string(),
        database_url: None,
        port: 8000,
        rust_log: "info".to_string(),
    }
}

/// Binds a local port that accepts connections and never answers them.
/// Returns the base URL to point a client at.
pub async fn stalled_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/api/v1")
}

#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Unavailable,
    ServerError,
}

/// Replays `replies` in order; the last reply repeats once the script is exhausted.
pub struct MockLlm {
    replies: Vec<MockReply>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
    delay: Option<Duration>,
}

impl MockLlm {
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![MockReply::Text(text.to_string())])
    }

    pub fn unavailable() -> Self {
        Self::scripted(vec![MockReply::Unavailable])
    }

    pub fn failing() -> Self {
        Self::scripted(vec![MockReply::ServerError])
    }

    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleeps before every reply, so concurrent callers interleave.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<Completion, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .get(n)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(MockReply::Unavailable);

        match reply {
            MockReply::Text(content) => Ok(Completion {
                content,
                model: MOCK_MODEL.to_string(),
                usage: Usage::default(),
            }),
            MockReply::Unavailable => Err(LlmError::MissingApiKey),
            MockReply::ServerError => Err(LlmError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            }),
        }
    }
}
