//! Feedback generation for a completed interview.
//!
//! Flow: evaluate unscored answers → synthesize → pick fallback formula →
//!       replace stored record → return.
//!
//! The previous record stays in place until the new one is ready, and the swap is a
//! single store operation.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::models::{FeedbackRecord, GenerateFeedbackRequest};
use crate::feedback::store::FeedbackStore;
use crate::llm_client::LlmProvider;
use crate::pipeline::answer_evaluator::evaluate_answer;
use crate::pipeline::models::Provenance;
use crate::pipeline::synthesizer::{synthesize, synthesize_from_scores};

pub async fn generate_feedback_for_interview(
    store: &dyn FeedbackStore,
    llm: &dyn LlmProvider,
    interview_id: Uuid,
    request: GenerateFeedbackRequest,
) -> Result<FeedbackRecord, AppError> {
    if request.questions.is_empty() {
        return Err(AppError::Validation(
            "Interview has no questions to generate feedback from".to_string(),
        ));
    }

    let GenerateFeedbackRequest {
        user_id,
        interview,
        mut questions,
    } = request;

    // Step 1: score answered questions that arrived without a score
    let mut prescored = false;
    let mut model_scored = 0usize;
    for record in questions.iter_mut().filter(|r| r.is_answered()) {
        if record.score.is_some() {
            prescored = true;
            continue;
        }
        let evaluation = evaluate_answer(
            llm,
            &record.question,
            record.answer_text(),
            &interview.role,
            &interview.interview_type,
        )
        .await;
        if evaluation.provenance == Provenance::Model {
            model_scored += 1;
        }
        record.score = Some(evaluation.score);
        record.feedback = Some(evaluation.feedback);
    }

    // Step 2: synthesize
    let mut feedback = synthesize(llm, &interview, &questions).await;

    // Step 3: real per-question scores beat the completion-count heuristic
    if feedback.provenance != Provenance::Model && (prescored || model_scored > 0) {
        warn!(
            "Synthesis degraded ({}) for interview {interview_id}; averaging per-question scores",
            feedback.provenance.as_str()
        );
        feedback = synthesize_from_scores(&questions);
    }

    // Step 4: persist
    let record = FeedbackRecord {
        id: Uuid::new_v4(),
        interview_id,
        user_id,
        role: interview.role,
        feedback,
        generated_at: Utc::now(),
    };
    if store.replace(&record).await? {
        info!("Replaced existing feedback for interview {interview_id}");
    }

    info!(
        "Feedback {} generated for interview {interview_id}: overall={} provenance={}",
        record.id,
        record.feedback.overall_score,
        record.feedback.provenance.as_str()
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::feedback::store::MemoryFeedbackStore;
    use crate::llm_client::mock::{MockLlm, MockReply};
    use crate::pipeline::models::{InterviewMetadata, QaRecord, QuestionType};

    fn request(questions: Vec<QaRecord>) -> GenerateFeedbackRequest {
        request_for(Uuid::new_v4(), questions)
    }

    fn request_for(user_id: Uuid, questions: Vec<QaRecord>) -> GenerateFeedbackRequest {
        GenerateFeedbackRequest {
            user_id,
            interview: InterviewMetadata {
                role: "Frontend Engineer".to_string(),
                interview_type: "mixed".to_string(),
                difficulty: 2,
                duration_minutes: 45,
            },
            questions,
        }
    }

    fn qa(answer: Option<&str>, score: Option<f64>) -> QaRecord {
        QaRecord {
            question_id: Some(Uuid::new_v4()),
            question: "How does the event loop work?".to_string(),
            answer: answer.map(str::to_string),
            question_type: QuestionType::Behavioral,
            score,
            feedback: None,
        }
    }

    #[tokio::test]
    async fn test_empty_question_list_is_rejected() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::failing();
        let result =
            generate_feedback_for_interview(&store, &llm, Uuid::new_v4(), request(vec![])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_down_uses_completion_heuristic() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::failing();
        let interview_id = Uuid::new_v4();
        let questions = vec![qa(Some("Tasks and microtasks."), None), qa(None, None)];

        let record = generate_feedback_for_interview(&store, &llm, interview_id, request(questions))
            .await
            .unwrap();

        // 1 evaluation + 1 synthesis, nothing from the model
        assert_eq!(llm.calls(), 2);
        assert_eq!(record.feedback.provenance, Provenance::Fallback);
        // 50% completion -> 75 - 10
        assert_eq!(record.feedback.overall_score, 65.0);
        assert_eq!(record.feedback.question_analysis[0].score, 70.0);
        assert!(store.find(interview_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_partial_evaluation_success_averages_scores() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::scripted(vec![
            MockReply::Text(r#"{"score": 90, "feedback": "Precise."}"#.to_string()),
            MockReply::ServerError,
            MockReply::ServerError,
        ]);
        let questions = vec![qa(Some("Answer one."), None), qa(Some("Answer two."), None)];

        let record =
            generate_feedback_for_interview(&store, &llm, Uuid::new_v4(), request(questions))
                .await
                .unwrap();

        assert_eq!(record.feedback.provenance, Provenance::Heuristic);
        // mean(90, 70)
        assert_eq!(record.feedback.overall_score, 80.0);
        assert_eq!(record.feedback.technical_score, 85.0);
        assert_eq!(record.feedback.communication_score, 77.0);
        assert_eq!(record.feedback.confidence_score, 82.0);
        assert_eq!(record.feedback.question_analysis[0].feedback, "Precise.");
    }

    #[tokio::test]
    async fn test_prescored_questions_are_not_reevaluated() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::failing();
        let questions = vec![qa(Some("Done."), Some(64.0))];

        let record =
            generate_feedback_for_interview(&store, &llm, Uuid::new_v4(), request(questions))
                .await
                .unwrap();

        // only the synthesis call
        assert_eq!(llm.calls(), 1);
        assert_eq!(record.feedback.provenance, Provenance::Heuristic);
        assert_eq!(record.feedback.overall_score, 64.0);
    }

    #[tokio::test]
    async fn test_model_synthesis_is_kept() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::scripted(vec![
            MockReply::Text(r#"{"score": 88}"#.to_string()),
            MockReply::Text(r#"{"overall_score": 86, "technical_score": 84}"#.to_string()),
        ]);
        let record = generate_feedback_for_interview(
            &store,
            &llm,
            Uuid::new_v4(),
            request(vec![qa(Some("Yes."), None)]),
        )
        .await
        .unwrap();

        assert_eq!(record.feedback.provenance, Provenance::Model);
        assert_eq!(record.feedback.overall_score, 86.0);
        assert_eq!(record.feedback.question_analysis[0].score, 88.0);
    }

    #[tokio::test]
    async fn test_regeneration_replaces_previous_record() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::failing();
        let interview_id = Uuid::new_v4();

        let first = generate_feedback_for_interview(
            &store,
            &llm,
            interview_id,
            request(vec![qa(Some("a"), None)]),
        )
        .await
        .unwrap();
        let second = generate_feedback_for_interview(
            &store,
            &llm,
            interview_id,
            request(vec![qa(Some("a"), None)]),
        )
        .await
        .unwrap();

        assert_ne!(first.id, second.id);
        let stored = store.find(interview_id).await.unwrap().unwrap();
        assert_eq!(stored.id, second.id);
    }

    #[tokio::test]
    async fn test_concurrent_regenerations_both_succeed() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::failing().with_delay(Duration::from_millis(20));
        let interview_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let (first, second) = tokio::join!(
            generate_feedback_for_interview(
                &store,
                &llm,
                interview_id,
                request_for(user_id, vec![qa(Some("a"), None)]),
            ),
            generate_feedback_for_interview(
                &store,
                &llm,
                interview_id,
                request_for(user_id, vec![qa(Some("b"), None)]),
            ),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        let stored = store.list_for_user(user_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].id == first.id || stored[0].id == second.id);
    }

    #[tokio::test]
    async fn test_previous_record_survives_while_regenerating() {
        let store = MemoryFeedbackStore::new();
        let interview_id = Uuid::new_v4();
        let first = generate_feedback_for_interview(
            &store,
            &MockLlm::failing(),
            interview_id,
            request(vec![qa(Some("a"), None)]),
        )
        .await
        .unwrap();

        let slow = MockLlm::failing().with_delay(Duration::from_millis(50));
        let regenerate = generate_feedback_for_interview(
            &store,
            &slow,
            interview_id,
            request(vec![qa(Some("a"), None)]),
        );
        let observe = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.find(interview_id).await.unwrap()
        };
        let (second, seen_mid_flight) = tokio::join!(regenerate, observe);

        assert_eq!(seen_mid_flight.map(|r| r.id), Some(first.id));
        let stored = store.find(interview_id).await.unwrap().unwrap();
        assert_eq!(stored.id, second.unwrap().id);
    }

    #[tokio::test]
    async fn test_score_on_unanswered_question_does_not_trigger_average() {
        let store = MemoryFeedbackStore::new();
        let llm = MockLlm::failing();
        let questions = vec![qa(Some("Answer."), None), qa(None, Some(10.0))];

        let record =
            generate_feedback_for_interview(&store, &llm, Uuid::new_v4(), request(questions))
                .await
                .unwrap();

        // evaluation fell back, so the completion heuristic stands: 50% -> 65
        assert_eq!(record.feedback.provenance, Provenance::Fallback);
        assert_eq!(record.feedback.overall_score, 65.0);
    }
}
