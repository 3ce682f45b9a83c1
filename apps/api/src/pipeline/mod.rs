// Feedback & evaluation pipeline.
// Question generation, answer evaluation, comprehensive synthesis.
// All LLM calls go through llm_client::LlmProvider; every operation returns usable
// data and records its provenance instead of failing.

pub mod answer_evaluator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod question_generator;
pub mod synthesizer;
