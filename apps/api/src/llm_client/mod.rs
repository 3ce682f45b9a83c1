/// LLM Client — the single point of entry for all chat-completion calls in MockMate.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through `LlmProvider`.
///
/// One attempt per call. A failed call is reported to the caller, which takes its
/// fallback path; there is no retry loop here.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[cfg(test)]
pub mod mock;
pub mod prompts;

const X_TITLE: &str = "MockMate Interview Simulator";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One chat message. `role` is "system", "user" or "assistant".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Per-call sampling options. `model: None` uses the client's default model.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// A successful completion: the first choice's text plus the model that served it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// The provider seam. `LlmClient` talks to the real endpoint; tests script replies.
///
/// Carried in `AppState` as `Arc<dyn LlmProvider>`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client for OpenRouter-compatible endpoints.
///
/// Cloning is cheap: clones share the underlying connection pool, so build one per
/// process and hand out clones.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    referer: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.openrouter_api_key.clone(),
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            default_model: config.default_model.clone(),
            referer: config.app_url.clone(),
        })
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmProvider for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, LlmError> {
        // Callers log this at warn level as they fall back.
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Err(LlmError::MissingApiKey);
        };

        let model = options.model.as_deref().unwrap_or(&self.default_model);
        let request_body = ChatRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", X_TITLE)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                debug!("LLM request error: {e}");
                LlmError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("LLM API returned {status}: {body}");
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let body: ChatResponse = serde_json::from_str(&body)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        debug!(
            "LLM call succeeded: prompt_tokens={}, completion_tokens={}, total_tokens={}",
            body.usage.prompt_tokens, body.usage.completion_tokens, body.usage.total_tokens
        );

        Ok(Completion {
            content,
            model: body.model.unwrap_or_else(|| model.to_string()),
            usage: body.usage,
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
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
