//! Feedback persistence — trait-based so the backend is chosen at startup.
//!
//! `PgFeedbackStore` when `DATABASE_URL` is set, `MemoryFeedbackStore` otherwise.
//! `AppState` holds an `Arc<dyn FeedbackStore>`.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::models::FeedbackRecord;
use crate::pipeline::models::{ComprehensiveFeedback, Provenance, QuestionAnalysis};

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn find(&self, interview_id: Uuid) -> Result<Option<FeedbackRecord>, AppError>;

    /// Atomically swaps out any record for `record.interview_id` for `record`.
    /// Returns whether a previous record was removed.
    async fn replace(&self, record: &FeedbackRecord) -> Result<bool, AppError>;

    /// All of a user's records, oldest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<FeedbackRecord>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: Uuid,
    interview_id: Uuid,
    user_id: Uuid,
    role: String,
    overall_score: f64,
    technical_score: f64,
    communication_score: f64,
    confidence_score: f64,
    strengths: Vec<String>,
    improvements: Vec<String>,
    detailed_feedback: String,
    suggestions: String,
    question_analysis: Value,
    model_used: String,
    provenance: String,
    generated_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = AppError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let question_analysis: Vec<QuestionAnalysis> =
            serde_json::from_value(row.question_analysis).map_err(|e| {
                AppError::Internal(anyhow!("Corrupt question_analysis for feedback {}: {e}", row.id))
            })?;
        let provenance = Provenance::parse(&row.provenance).ok_or_else(|| {
            AppError::Internal(anyhow!(
                "Unknown provenance '{}' for feedback {}",
                row.provenance,
                row.id
            ))
        })?;

        Ok(FeedbackRecord {
            id: row.id,
            interview_id: row.interview_id,
            user_id: row.user_id,
            role: row.role,
            feedback: ComprehensiveFeedback {
                overall_score: row.overall_score,
                technical_score: row.technical_score,
                communication_score: row.communication_score,
                confidence_score: row.confidence_score,
                strengths: row.strengths,
                improvements: row.improvements,
                detailed_feedback: row.detailed_feedback,
                suggestions: row.suggestions,
                question_analysis,
                model_used: row.model_used,
                provenance,
            },
            generated_at: row.generated_at,
        })
    }
}

pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn find(&self, interview_id: Uuid) -> Result<Option<FeedbackRecord>, AppError> {
        let row: Option<FeedbackRow> =
            sqlx::query_as("SELECT * FROM interview_feedback WHERE interview_id = $1")
                .bind(interview_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(FeedbackRecord::try_from).transpose()
    }

    async fn replace(&self, record: &FeedbackRecord) -> Result<bool, AppError> {
        let analysis = serde_json::to_value(&record.feedback.question_analysis).map_err(|e| {
            AppError::Internal(anyhow!("Failed to serialize question_analysis: {e}"))
        })?;

        let mut tx = self.pool.begin().await?;

        // Serializes concurrent regenerations of the same interview.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(record.interview_id.to_string())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM interview_feedback WHERE interview_id = $1")
            .bind(record.interview_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO interview_feedback
                (id, interview_id, user_id, role,
                 overall_score, technical_score, communication_score, confidence_score,
                 strengths, improvements, detailed_feedback, suggestions,
                 question_analysis, model_used, provenance, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(record.id)
        .bind(record.interview_id)
        .bind(record.user_id)
        .bind(&record.role)
        .bind(record.feedback.overall_score)
        .bind(record.feedback.technical_score)
        .bind(record.feedback.communication_score)
        .bind(record.feedback.confidence_score)
        .bind(&record.feedback.strengths)
        .bind(&record.feedback.improvements)
        .bind(&record.feedback.detailed_feedback)
        .bind(&record.feedback.suggestions)
        .bind(&analysis)
        .bind(&record.feedback.model_used)
        .bind(record.feedback.provenance.as_str())
        .bind(record.generated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(deleted.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<FeedbackRecord>, AppError> {
        let rows: Vec<FeedbackRow> = sqlx::query_as(
            "SELECT * FROM interview_feedback WHERE user_id = $1 ORDER BY generated_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(FeedbackRecord::try_from).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

/// Keeps records in insertion order; contents are lost on restart.
#[derive(Default)]
pub struct MemoryFeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn find(&self, interview_id: Uuid) -> Result<Option<FeedbackRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.interview_id == interview_id).cloned())
    }

    async fn replace(&self, record: &FeedbackRecord) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.interview_id != record.interview_id);
        let replaced = records.len() != before;
        records.push(record.clone());
        Ok(replaced)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<FeedbackRecord>, AppError> {
        let records = self.records.read().await;
        let mut mine: Vec<FeedbackRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by_key(|r| r.generated_at);
        Ok(mine)
    }
}
