// Interview feedback resource.
// Implements: generation orchestration, persistence, grading, summaries, user stats.
// Model calls are delegated to the pipeline; nothing here talks to the provider.

pub mod grading;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;
