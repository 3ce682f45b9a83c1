use anyhow::{Context, Result};
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "anthropic/claude-3-sonnet";

/// Application configuration loaded from environment variables.
///
/// Nothing is strictly required: without `OPENROUTER_API_KEY` every model call takes
/// its fallback path, and without `DATABASE_URL` feedback is kept in process memory.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub default_model: String,
    /// Upper bound on a single outbound LLM call, in seconds.
    pub llm_timeout_secs: u64,
    /// Sent as `HTTP-Referer` to the provider.
    pub app_url: String,
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openrouter_base_url: optional_env("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_model: optional_env("DEFAULT_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            app_url: optional_env("APP_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            database_url: optional_env("DATABASE_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Logs settings that degrade behavior without preventing startup.
    pub fn warn_on_degraded(&self) {
        if self.openrouter_api_key.is_none() {
            warn!("OPENROUTER_API_KEY not set. AI features will use fallback content.");
        }
        if self.database_url.is_none() {
            warn!("DATABASE_URL not set. Feedback records are kept in memory only.");
        }
    }
}

/// Reads an env var, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
