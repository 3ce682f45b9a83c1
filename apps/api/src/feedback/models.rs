use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::models::{ComprehensiveFeedback, InterviewMetadata, QaRecord};

/// Persisted comprehensive feedback for one interview. Never updated in place:
/// regeneration replaces the old record with a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    #[serde(flatten)]
    pub feedback: ComprehensiveFeedback,
    pub generated_at: DateTime<Utc>,
}

/// Request body for feedback generation. The caller owns the interview and its
/// questions and passes them in.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateFeedbackRequest {
    pub user_id: Uuid,
    pub interview: InterviewMetadata,
    pub questions: Vec<QaRecord>,
}
