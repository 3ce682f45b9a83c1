//! Question Generator — asks the model for the next interview question.
//!
//! Any failure (no key, network, non-2xx, empty reply) resolves to a random pick
//! from the fallback bank for the classified type. Never returns an error.

use rand::seq::SliceRandom;
use tracing::{error, info, warn};

use crate::llm_client::prompts::DIFFICULTY_LEGEND;
use crate::llm_client::{ChatMessage, CompletionOptions, LlmError, LlmProvider};
use crate::pipeline::models::{GeneratedQuestion, PriorTurn, Provenance, QuestionType};
use crate::pipeline::prompts::{
    FIRST_QUESTION_PROMPT, NEXT_QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM_TEMPLATE,
};

pub const TECHNICAL_FALLBACK_QUESTIONS: &[&str] = &[
    "Explain the difference between a stack and a queue.",
    "How would you optimize a slow database query?",
    "Describe the process of debugging a production issue.",
    "What are the key principles of good software design?",
];

pub const BEHAVIORAL_FALLBACK_QUESTIONS: &[&str] = &[
    "Tell me about a time you had to work with a difficult team member.",
    "Describe a project where you had to learn something new quickly.",
    "How do you prioritize tasks when you have multiple deadlines?",
    "Give me an example of when you had to make a difficult decision.",
];

pub const FALLBACK_MODEL: &str = "fallback";

pub fn fallback_bank(question_type: QuestionType) -> &'static [&'static str] {
    match question_type {
        QuestionType::Technical => TECHNICAL_FALLBACK_QUESTIONS,
        QuestionType::Behavioral => BEHAVIORAL_FALLBACK_QUESTIONS,
    }
}

/// Generates one question. `context` is a free-form summary of earlier turns.
pub async fn generate_question(
    llm: &dyn LlmProvider,
    role: &str,
    interview_type: &str,
    difficulty: u8,
    context: Option<&str>,
    question_number: u32,
) -> GeneratedQuestion {
    let question_type = QuestionType::classify(interview_type);
    let messages = build_messages(role, interview_type, difficulty, context, question_number);

    let result = llm.complete(&messages, &CompletionOptions::default()).await;

    match result {
        Ok(completion) => {
            let text = completion.content.trim();
            if text.is_empty() {
                warn!("Question generation returned an empty reply, using fallback bank");
                return fallback_question(question_type, difficulty);
            }
            info!(
                "Generated question {} for {role} ({interview_type}) via {}",
                question_number, completion.model
            );
            GeneratedQuestion {
                question: text.to_string(),
                question_type,
                difficulty,
                model_used: completion.model,
                provenance: Provenance::Model,
            }
        }
        Err(LlmError::MissingApiKey) => {
            warn!("Question generation skipped model call: provider not configured");
            fallback_question(question_type, difficulty)
        }
        Err(e) => {
            error!("Question generation failed, using fallback bank: {e}");
            fallback_question(question_type, difficulty)
        }
    }
}

/// Renders prior turns into the context string the generator expects.
pub fn summarize_prior_turns(turns: &[PriorTurn]) -> Option<String> {
    if turns.is_empty() {
        return None;
    }
    let summary = turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let answer = turn
                .answer
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or("(no answer)");
            format!("Q{}: {}\nA{}: {}", i + 1, turn.question.trim(), i + 1, answer)
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    Some(summary)
}

fn build_messages(
    role: &str,
    interview_type: &str,
    difficulty: u8,
    context: Option<&str>,
    question_number: u32,
) -> Vec<ChatMessage> {
    let system = QUESTION_SYSTEM_TEMPLATE
        .replace("{role}", role)
        .replace("{interview_type}", interview_type)
        .replace("{difficulty}", &difficulty.to_string())
        .replace("{difficulty_legend}", DIFFICULTY_LEGEND)
        .replace("{question_number}", &question_number.to_string());

    let user = match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => NEXT_QUESTION_PROMPT_TEMPLATE.replace("{context}", context),
        None => FIRST_QUESTION_PROMPT.to_string(),
    };

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

fn fallback_question(question_type: QuestionType, difficulty: u8) -> GeneratedQuestion {
    let bank = fallback_bank(question_type);
    let question = bank
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(bank[0]);

    GeneratedQuestion {
        question: question.to_string(),
        question_type,
        difficulty,
        model_used: FALLBACK_MODEL.to_string(),
        provenance: Provenance::Fallback,
    }
}
