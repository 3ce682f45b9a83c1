//! Axum route handlers for the stateless pipeline operations.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::answer_evaluator::evaluate_answer;
use crate::pipeline::models::{AnswerEvaluation, GeneratedQuestion, PriorTurn};
use crate::pipeline::question_generator::{generate_question, summarize_prior_turns};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    pub role: String,
    pub interview_type: String,
    /// Range-checked in the handler so out-of-range values get a validation error.
    pub difficulty: i64,
    /// Prebuilt summary of earlier turns. Takes precedence over `prior_turns`.
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub prior_turns: Vec<PriorTurn>,
    #[serde(default = "first_question")]
    pub question_number: u32,
}

fn first_question() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct EvaluateAnswerRequest {
    pub question: String,
    pub answer: String,
    pub role: String,
    pub interview_type: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/questions/generate
pub async fn handle_generate_question(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionRequest>,
) -> Result<Json<GeneratedQuestion>, AppError> {
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    let difficulty = u8::try_from(request.difficulty)
        .ok()
        .filter(|d| (1..=4).contains(d))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "difficulty must be between 1 and 4, got {}",
                request.difficulty
            ))
        })?;
    if request.question_number == 0 {
        return Err(AppError::Validation(
            "question_number must be positive".to_string(),
        ));
    }

    let context = request
        .context
        .clone()
        .or_else(|| summarize_prior_turns(&request.prior_turns));

    let question = generate_question(
        state.llm.as_ref(),
        &request.role,
        &request.interview_type,
        difficulty,
        context.as_deref(),
        request.question_number,
    )
    .await;

    Ok(Json(question))
}

/// POST /api/v1/answers/evaluate
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<EvaluateAnswerRequest>,
) -> Result<Json<AnswerEvaluation>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let evaluation = evaluate_answer(
        state.llm.as_ref(),
        &request.question,
        &request.answer,
        &request.role,
        &request.interview_type,
    )
    .await;

    Ok(Json(evaluation))
}
