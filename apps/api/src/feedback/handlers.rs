//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::grading::{
    compute_user_stats, score_breakdown, summarize, FeedbackSummary, ScoreBreakdown,
    UserFeedbackStats,
};
use crate::feedback::models::{FeedbackRecord, GenerateFeedbackRequest};
use crate::feedback::service::generate_feedback_for_interview;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeedbackDetailResponse {
    #[serde(flatten)]
    pub record: FeedbackRecord,
    pub breakdown: ScoreBreakdown,
}

impl From<FeedbackRecord> for FeedbackDetailResponse {
    fn from(record: FeedbackRecord) -> Self {
        let breakdown = score_breakdown(&record);
        Self { record, breakdown }
    }
}

/// POST /api/v1/feedback/:interview_id/generate
///
/// Deletes any existing feedback for the interview, then generates and stores a new one.
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<GenerateFeedbackRequest>,
) -> Result<Json<FeedbackDetailResponse>, AppError> {
    let record = generate_feedback_for_interview(
        state.feedback_store.as_ref(),
        state.llm.as_ref(),
        interview_id,
        request,
    )
    .await?;

    Ok(Json(record.into()))
}

/// GET /api/v1/feedback/:interview_id
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<FeedbackDetailResponse>, AppError> {
    let record = state
        .feedback_store
        .find(interview_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Feedback for interview {interview_id} not found"))
        })?;

    Ok(Json(record.into()))
}

/// GET /api/v1/feedback/:interview_id/summary
pub async fn handle_feedback_summary(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<FeedbackSummary>, AppError> {
    let record = state.feedback_store.find(interview_id).await?;
    Ok(Json(summarize(interview_id, record.as_ref())))
}

/// GET /api/v1/users/:user_id/feedback-stats
pub async fn handle_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserFeedbackStats>, AppError> {
    let records = state.feedback_store.list_for_user(user_id).await?;
    Ok(Json(compute_user_stats(&records)))
}
