//! Comprehensive Feedback Synthesizer — one overall assessment per completed interview.
//!
//! Flow: metadata + Q&A → one model call → parse → `ComprehensiveFeedback`.
//! A failed call or an unparseable reply degrades to `completion_heuristic`, which
//! depends only on answered/total counts.
//!
//! `synthesize_from_scores` is a second, independent heuristic that averages
//! per-question scores. The two formulas disagree on purpose; see DESIGN.md.

use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, ChatMessage, CompletionOptions, LlmError, LlmProvider};
use crate::pipeline::models::{
    clamp_score, owned_list, ComprehensiveFeedback, InterviewMetadata, Provenance, QaRecord,
    QuestionAnalysis,
};
use crate::pipeline::prompts::{SYNTHESIS_PROMPT_TEMPLATE, SYNTHESIS_SYSTEM_TEMPLATE};
use crate::pipeline::question_generator::FALLBACK_MODEL;

/// Answers are cut to this many characters in the synthesis prompt.
pub const ANSWER_PREVIEW_CHARS: usize = 200;

const DEFAULT_SCORE: f64 = 75.0;
const DEFAULT_STRENGTHS: &[&str] = &["Good overall performance"];
const DEFAULT_IMPROVEMENTS: &[&str] = &["Continue practicing"];
const DEFAULT_DETAILED: &str = "Solid interview performance with room for growth.";
const DEFAULT_SUGGESTIONS: &str = "Keep practicing and focus on specific examples.";

const COMPLETION_STRENGTHS: &[&str] = &[
    "Completed the interview session",
    "Provided responses to questions",
    "Demonstrated engagement",
    "Showed professional attitude",
];
const COMPLETION_IMPROVEMENTS: &[&str] = &[
    "Provide more specific examples",
    "Elaborate on technical details",
    "Ask clarifying questions",
    "Practice articulating thoughts clearly",
];
const COMPLETION_SUGGESTIONS: &str = "Continue practicing mock interviews, prepare specific \
    examples from your experience, and work on clearly articulating your thought process \
    during technical discussions.";

const AVERAGE_STRENGTHS: &[&str] = &[
    "Completed the interview session",
    "Provided thoughtful responses",
    "Demonstrated engagement",
    "Showed professional attitude",
];
const AVERAGE_IMPROVEMENTS: &[&str] = &[
    "Provide more specific examples",
    "Elaborate on technical details",
    "Practice articulating thoughts clearly",
    "Ask clarifying questions when needed",
];
const AVERAGE_SUGGESTIONS: &str = "Continue practicing mock interviews, prepare specific \
    examples from your experience, and work on clearly explaining your thought process \
    during technical discussions.";

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    overall_score: Option<f64>,
    technical_score: Option<f64>,
    communication_score: Option<f64>,
    confidence_score: Option<f64>,
    strengths: Option<Vec<String>>,
    improvements: Option<Vec<String>>,
    detailed_feedback: Option<String>,
    suggestions: Option<String>,
}

/// Produces the overall feedback for an interview. Never fails.
pub async fn synthesize(
    llm: &dyn LlmProvider,
    metadata: &InterviewMetadata,
    records: &[QaRecord],
) -> ComprehensiveFeedback {
    let messages = build_messages(metadata, records);

    match llm.complete(&messages, &CompletionOptions::default()).await {
        Ok(completion) => {
            match serde_json::from_str::<RawSynthesis>(strip_json_fences(&completion.content)) {
                Ok(raw) => {
                    info!(
                        "Synthesized feedback for {} interview via {} ({} tokens)",
                        metadata.role, completion.model, completion.usage.total_tokens
                    );
                    from_model(raw, records, completion.model)
                }
                Err(e) => {
                    warn!("Synthesis reply was not valid JSON ({e}), using completion heuristic");
                    completion_heuristic(records, Provenance::ParseFallback)
                }
            }
        }
        Err(LlmError::MissingApiKey) => {
            warn!("Synthesis skipped model call: provider not configured");
            completion_heuristic(records, Provenance::Fallback)
        }
        Err(e) => {
            error!("Synthesis request failed, using completion heuristic: {e}");
            completion_heuristic(records, Provenance::Fallback)
        }
    }
}

/// Averaging heuristic over the scores of answered questions (75 when none).
///
/// technical = min(avg+5, 100), communication = max(avg-3, 0), confidence = avg+2.
/// Confidence is unbounded in the formula; it is clamped here with the rest.
pub fn synthesize_from_scores(records: &[QaRecord]) -> ComprehensiveFeedback {
    let scores: Vec<f64> = records
        .iter()
        .filter(|r| r.is_answered())
        .filter_map(|r| r.score)
        .collect();
    let average = if scores.is_empty() {
        DEFAULT_SCORE
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    ComprehensiveFeedback {
        overall_score: clamp_score(average),
        technical_score: clamp_score((average + 5.0).min(100.0)),
        communication_score: clamp_score((average - 3.0).max(0.0)),
        confidence_score: clamp_score(average + 2.0),
        strengths: owned_list(AVERAGE_STRENGTHS),
        improvements: owned_list(AVERAGE_IMPROVEMENTS),
        detailed_feedback: format!(
            "You completed {} questions in this interview session. Your responses demonstrate \
            good engagement and understanding. The average quality of your answers suggests solid \
            preparation. To improve further, focus on providing more detailed examples and \
            practicing clear articulation of your thoughts. Overall, this was a productive \
            interview session.",
            records.len()
        ),
        suggestions: AVERAGE_SUGGESTIONS.to_string(),
        question_analysis: records.iter().map(QuestionAnalysis::from).collect(),
        model_used: FALLBACK_MODEL.to_string(),
        provenance: Provenance::Heuristic,
    }
}

/// Completion-rate heuristic: base = min(75 + (rate - 100) * 0.2, 85).
fn completion_heuristic(records: &[QaRecord], provenance: Provenance) -> ComprehensiveFeedback {
    let total = records.len();
    let answered = records.iter().filter(|r| r.is_answered()).count();
    let base = completion_base_score(answered, total);

    ComprehensiveFeedback {
        overall_score: clamp_score(base),
        technical_score: clamp_score(base + 5.0),
        communication_score: clamp_score(base - 2.0),
        confidence_score: clamp_score(base + 1.0),
        strengths: owned_list(COMPLETION_STRENGTHS),
        improvements: owned_list(COMPLETION_IMPROVEMENTS),
        detailed_feedback: format!(
            "You completed {answered} out of {total} questions in this interview. Your responses \
            show good engagement and understanding. To improve, focus on providing more detailed \
            examples and asking clarifying questions when needed. Overall, this was a solid \
            performance that demonstrates your potential."
        ),
        suggestions: COMPLETION_SUGGESTIONS.to_string(),
        question_analysis: records.iter().map(QuestionAnalysis::from).collect(),
        model_used: FALLBACK_MODEL.to_string(),
        provenance,
    }
}

fn completion_base_score(answered: usize, total: usize) -> f64 {
    let completion_rate = if total > 0 {
        answered as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    (75.0 + (completion_rate - 100.0) * 0.2).min(85.0)
}

fn from_model(raw: RawSynthesis, records: &[QaRecord], model_used: String) -> ComprehensiveFeedback {
    ComprehensiveFeedback {
        overall_score: clamp_score(raw.overall_score.unwrap_or(DEFAULT_SCORE)),
        technical_score: clamp_score(raw.technical_score.unwrap_or(DEFAULT_SCORE)),
        communication_score: clamp_score(raw.communication_score.unwrap_or(DEFAULT_SCORE)),
        confidence_score: clamp_score(raw.confidence_score.unwrap_or(DEFAULT_SCORE)),
        strengths: raw.strengths.unwrap_or_else(|| owned_list(DEFAULT_STRENGTHS)),
        improvements: raw.improvements.unwrap_or_else(|| owned_list(DEFAULT_IMPROVEMENTS)),
        detailed_feedback: raw
            .detailed_feedback
            .unwrap_or_else(|| DEFAULT_DETAILED.to_string()),
        suggestions: raw
            .suggestions
            .unwrap_or_else(|| DEFAULT_SUGGESTIONS.to_string()),
        question_analysis: records.iter().map(QuestionAnalysis::from).collect(),
        model_used,
        provenance: Provenance::Model,
    }
}

fn build_messages(metadata: &InterviewMetadata, records: &[QaRecord]) -> Vec<ChatMessage> {
    let system = SYNTHESIS_SYSTEM_TEMPLATE
        .replace("{role}", &metadata.role)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION);

    let interview = json!({
        "role": metadata.role,
        "interview_type": metadata.interview_type,
        "difficulty": metadata.difficulty,
        "duration": metadata.duration_minutes,
        "questions_count": records.len(),
        "answered_count": records.iter().filter(|r| r.is_answered()).count(),
    });
    // Serializing a json! literal cannot fail.
    let interview_json = serde_json::to_string_pretty(&interview).unwrap_or_default();

    let prompt = SYNTHESIS_PROMPT_TEMPLATE
        .replace("{interview_json}", &interview_json)
        .replace("{qa_context}", &build_qa_context(records));

    vec![ChatMessage::system(system), ChatMessage::user(prompt)]
}

fn build_qa_context(records: &[QaRecord]) -> String {
    records
        .iter()
        .map(|r| {
            let preview: String = r.answer_text().chars().take(ANSWER_PREVIEW_CHARS).collect();
            format!("Q: {}\nA: {preview}...", r.question)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
