use std::sync::Arc;

use crate::feedback::store::FeedbackStore;
use crate::llm_client::LlmProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// One pooled client per process; handlers share it through the `Arc`.
    pub llm: Arc<dyn LlmProvider>,
    /// Postgres-backed when DATABASE_URL is set, in-process otherwise.
    pub feedback_store: Arc<dyn FeedbackStore>,
}
