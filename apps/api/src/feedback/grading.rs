//! Grades, score breakdowns, summaries and per-user statistics over stored feedback.
//! Pure functions; no LLM calls and no I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::feedback::models::FeedbackRecord;

/// Number of most recent interviews in the trend window and `recent_performance`.
const RECENT_WINDOW: usize = 5;

pub fn grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 70.0 {
        "C"
    } else if score >= 60.0 {
        "D"
    } else {
        "F"
    }
}

pub fn performance_level(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellent"
    } else if score >= 80.0 {
        "Good"
    } else if score >= 70.0 {
        "Average"
    } else if score >= 60.0 {
        "Below Average"
    } else {
        "Needs Improvement"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallBreakdown {
    pub score: f64,
    pub grade: &'static str,
    pub level: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisBreakdown {
    pub score: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub overall: OverallBreakdown,
    pub technical: AxisBreakdown,
    pub communication: AxisBreakdown,
    pub confidence: AxisBreakdown,
}

pub fn score_breakdown(record: &FeedbackRecord) -> ScoreBreakdown {
    let fb = &record.feedback;
    let axis = |score: f64| AxisBreakdown {
        score,
        percentage: round1(score),
    };
    ScoreBreakdown {
        overall: OverallBreakdown {
            score: fb.overall_score,
            grade: grade(fb.overall_score),
            level: performance_level(fb.overall_score),
        },
        technical: axis(fb.technical_score),
        communication: axis(fb.communication_score),
        confidence: axis(fb.confidence_score),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSummary {
    pub interview_id: Uuid,
    pub feedback_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn summarize(interview_id: Uuid, record: Option<&FeedbackRecord>) -> FeedbackSummary {
    match record {
        None => FeedbackSummary {
            interview_id,
            feedback_available: false,
            message: Some("Feedback not yet generated".to_string()),
            overall_score: None,
            performance_level: None,
            grade: None,
            strengths_count: None,
            improvements_count: None,
            generated_at: None,
        },
        Some(record) => {
            let score = record.feedback.overall_score;
            FeedbackSummary {
                interview_id,
                feedback_available: true,
                message: None,
                overall_score: Some(score),
                performance_level: Some(performance_level(score)),
                grade: Some(grade(score)),
                strengths_count: Some(record.feedback.strengths.len()),
                improvements_count: Some(record.feedback.improvements.len()),
                generated_at: Some(record.generated_at),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentPerformance {
    pub interview_id: Uuid,
    pub score: f64,
    pub date: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserFeedbackStats {
    pub total_interviews: usize,
    pub average_score: f64,
    pub average_technical: f64,
    pub average_communication: f64,
    pub improvement_trend: f64,
    pub best_score: f64,
    pub recent_performance: Vec<RecentPerformance>,
}

/// `records` must be ordered oldest first.
///
/// The trend compares the last five interviews against the five before them and is
/// only reported once ten interviews exist.
pub fn compute_user_stats(records: &[FeedbackRecord]) -> UserFeedbackStats {
    if records.is_empty() {
        return UserFeedbackStats {
            total_interviews: 0,
            average_score: 0.0,
            average_technical: 0.0,
            average_communication: 0.0,
            improvement_trend: 0.0,
            best_score: 0.0,
            recent_performance: vec![],
        };
    }

    let overall: Vec<f64> = records.iter().map(|r| r.feedback.overall_score).collect();
    let technical: Vec<f64> = records.iter().map(|r| r.feedback.technical_score).collect();
    let communication: Vec<f64> = records
        .iter()
        .map(|r| r.feedback.communication_score)
        .collect();

    let n = overall.len();
    let improvement_trend = if n >= 2 * RECENT_WINDOW {
        let recent = &overall[n - RECENT_WINDOW..];
        let previous = &overall[n - 2 * RECENT_WINDOW..n - RECENT_WINDOW];
        mean(recent) - mean(previous)
    } else {
        0.0
    };

    let recent_performance = records[n.saturating_sub(RECENT_WINDOW)..]
        .iter()
        .map(|r| RecentPerformance {
            interview_id: r.interview_id,
            score: r.feedback.overall_score,
            date: r.generated_at,
            role: r.role.clone(),
        })
        .collect();

    UserFeedbackStats {
        total_interviews: n,
        average_score: round1(mean(&overall)),
        average_technical: round1(mean(&technical)),
        average_communication: round1(mean(&communication)),
        improvement_trend: round1(improvement_trend),
        best_score: overall.iter().copied().fold(f64::MIN, f64::max),
        recent_performance,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
