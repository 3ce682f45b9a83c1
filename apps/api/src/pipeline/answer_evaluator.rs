//! Answer Evaluator — scores one question/answer pair.
//!
//! Three outcomes, told apart by `provenance`:
//! - `Model`: the reply parsed as JSON; absent keys take defaults.
//! - `ParseFallback`: the model replied with something that is not the JSON object;
//!   the raw reply becomes the feedback text.
//! - `Fallback`: no usable reply at all; fixed canned evaluation.

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, ChatMessage, CompletionOptions, LlmError, LlmProvider};
use crate::pipeline::models::{clamp_score, owned_list, AnswerEvaluation, Provenance};
use crate::pipeline::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM_TEMPLATE};
use crate::pipeline::question_generator::FALLBACK_MODEL;

/// Score assumed when the model omits it or its reply cannot be parsed.
pub const DEFAULT_SCORE: f64 = 75.0;
/// Score of the canned evaluation used when the request itself fails.
pub const FALLBACK_SCORE: f64 = 70.0;

const DEFAULT_FEEDBACK: &str = "Good response overall.";
const DEFAULT_STRENGTHS: &[&str] = &["Clear communication"];
const DEFAULT_IMPROVEMENTS: &[&str] = &["Could provide more specific examples"];

const PARSE_FALLBACK_STRENGTHS: &[&str] = &["Provided a response"];
const PARSE_FALLBACK_IMPROVEMENTS: &[&str] = &["Could be more detailed"];

const FALLBACK_FEEDBACK: &str = "Your answer shows understanding of the topic. \
    Consider providing more specific examples and details to strengthen your response.";
const FALLBACK_STRENGTHS: &[&str] = &["Addressed the question", "Clear communication"];
const FALLBACK_IMPROVEMENTS: &[&str] = &["Add specific examples", "Provide more technical details"];

/// Shape the model is asked to return. Every key is optional.
#[derive(Debug, Deserialize)]
struct RawEvaluation {
    score: Option<f64>,
    feedback: Option<String>,
    strengths: Option<Vec<String>>,
    improvements: Option<Vec<String>>,
}

pub async fn evaluate_answer(
    llm: &dyn LlmProvider,
    question: &str,
    answer: &str,
    role: &str,
    interview_type: &str,
) -> AnswerEvaluation {
    let system = EVALUATION_SYSTEM_TEMPLATE
        .replace("{role}", role)
        .replace("{interview_type}", interview_type)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION);
    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);
    let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];

    match llm.complete(&messages, &CompletionOptions::default()).await {
        Ok(completion) => parse_evaluation(&completion.content, completion.model),
        Err(LlmError::MissingApiKey) => {
            warn!("Answer evaluation skipped model call: provider not configured");
            request_fallback()
        }
        Err(e) => {
            error!("Answer evaluation request failed, using fallback: {e}");
            request_fallback()
        }
    }
}

fn parse_evaluation(content: &str, model_used: String) -> AnswerEvaluation {
    match serde_json::from_str::<RawEvaluation>(strip_json_fences(content)) {
        Ok(raw) => {
            debug!("Answer evaluation parsed: score={:?}", raw.score);
            AnswerEvaluation {
                score: clamp_score(raw.score.unwrap_or(DEFAULT_SCORE)),
                feedback: raw.feedback.unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
                strengths: raw.strengths.unwrap_or_else(|| owned_list(DEFAULT_STRENGTHS)),
                improvements: raw
                    .improvements
                    .unwrap_or_else(|| owned_list(DEFAULT_IMPROVEMENTS)),
                model_used,
                provenance: Provenance::Model,
            }
        }
        Err(e) => {
            warn!("Answer evaluation reply was not valid JSON ({e}), keeping raw text");
            AnswerEvaluation {
                score: DEFAULT_SCORE,
                feedback: content.to_string(),
                strengths: owned_list(PARSE_FALLBACK_STRENGTHS),
                improvements: owned_list(PARSE_FALLBACK_IMPROVEMENTS),
                model_used,
                provenance: Provenance::ParseFallback,
            }
        }
    }
}

fn request_fallback() -> AnswerEvaluation {
    AnswerEvaluation {
        score: FALLBACK_SCORE,
        feedback: FALLBACK_FEEDBACK.to_string(),
        strengths: owned_list(FALLBACK_STRENGTHS),
        improvements: owned_list(FALLBACK_IMPROVEMENTS),
        model_used: FALLBACK_MODEL.to_string(),
        provenance: Provenance::Fallback,
    }
}
