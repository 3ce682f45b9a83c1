//! Plain-data inputs and outputs of the feedback pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a pipeline output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Genuine model output.
    Model,
    /// Provider unavailable or request failed; canned content.
    Fallback,
    /// The model replied but its JSON could not be parsed.
    ParseFallback,
    /// Computed from per-question scores only.
    Heuristic,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
            Self::ParseFallback => "parse_fallback",
            Self::Heuristic => "heuristic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "model" => Some(Self::Model),
            "fallback" => Some(Self::Fallback),
            "parse_fallback" => Some(Self::ParseFallback),
            "heuristic" => Some(Self::Heuristic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Behavioral,
}

impl QuestionType {
    /// Technical iff the interview type mentions "technical" anywhere, ignoring case.
    /// "mixed" interviews therefore classify as behavioral.
    pub fn classify(interview_type: &str) -> Self {
        if interview_type.to_lowercase().contains("technical") {
            Self::Technical
        } else {
            Self::Behavioral
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: u8,
    pub model_used: String,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub score: f64,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub model_used: String,
    pub provenance: Provenance,
}

/// One earlier question/answer exchange, used to steer away from repeats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorTurn {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Interview attributes the synthesizer shows the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewMetadata {
    pub role: String,
    pub interview_type: String,
    pub difficulty: u8,
    pub duration_minutes: u32,
}

/// A question as asked in the interview, with whatever answer and score it has so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRecord {
    #[serde(default)]
    pub question_id: Option<Uuid>,
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default = "default_question_type", rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

fn default_question_type() -> QuestionType {
    QuestionType::Behavioral
}

impl QaRecord {
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or("")
    }

    pub fn is_answered(&self) -> bool {
        !self.answer_text().trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub question_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub score: f64,
    pub feedback: String,
}

impl From<&QaRecord> for QuestionAnalysis {
    fn from(record: &QaRecord) -> Self {
        Self {
            question_id: record.question_id,
            question: record.question.clone(),
            answer: record.answer_text().to_string(),
            question_type: record.question_type,
            score: clamp_score(record.score.unwrap_or(0.0)),
            feedback: record.feedback.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveFeedback {
    pub overall_score: f64,
    pub technical_score: f64,
    pub communication_score: f64,
    pub confidence_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
    pub suggestions: String,
    pub question_analysis: Vec<QuestionAnalysis>,
    pub model_used: String,
    pub provenance: Provenance,
}

/// Clamps a score into [0, 100]. NaN becomes 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

pub(crate) fn owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
