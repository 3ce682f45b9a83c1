pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::pipeline::handlers as pipeline;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pipeline API
        .route(
            "/api/v1/questions/generate",
            post(pipeline::handle_generate_question),
        )
        .route(
            "/api/v1/answers/evaluate",
            post(pipeline::handle_evaluate_answer),
        )
        // Feedback API
        .route(
            "/api/v1/feedback/:interview_id",
            get(feedback::handle_get_feedback),
        )
        .route(
            "/api/v1/feedback/:interview_id/generate",
            post(feedback::handle_generate_feedback),
        )
        .route(
            "/api/v1/feedback/:interview_id/summary",
            get(feedback::handle_feedback_summary),
        )
        .route(
            "/api/v1/users/:user_id/feedback-stats",
            get(feedback::handle_user_stats),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    use super::*;
    use crate::feedback::store::MemoryFeedbackStore;
    use crate::llm_client::mock::MockLlm;
    use crate::pipeline::question_generator::TECHNICAL_FALLBACK_QUESTIONS;

    fn app_with(llm: MockLlm) -> Router {
        build_router(AppState {
            llm: Arc::new(llm),
            feedback_store: Arc::new(MemoryFeedbackStore::new()),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn extract_json(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Should read body");
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    }

    fn feedback_body(user_id: Uuid) -> Value {
        json!({
            "user_id": user_id,
            "interview": {
                "role": "Backend Engineer",
                "interview_type": "technical",
                "difficulty": 3,
                "duration_minutes": 30
            },
            "questions": [
                {"question": "What is a deadlock?", "answer": "Two threads waiting on each other.", "type": "technical"},
                {"question": "How do you test async code?", "answer": "", "type": "technical"}
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app_with(MockLlm::failing())
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_question_falls_back_when_provider_down() {
        let response = app_with(MockLlm::failing())
            .oneshot(post_json(
                "/api/v1/questions/generate",
                json!({"role": "SRE", "interview_type": "technical", "difficulty": 2}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["type"], "technical");
        assert_eq!(body["provenance"], "fallback");
        let question = body["question"].as_str().unwrap();
        assert!(TECHNICAL_FALLBACK_QUESTIONS.contains(&question));
    }

    #[tokio::test]
    async fn test_generate_question_rejects_bad_difficulty() {
        for difficulty in [json!(0), json!(5), json!(256), json!(-1)] {
            let response = app_with(MockLlm::failing())
                .oneshot(post_json(
                    "/api/v1/questions/generate",
                    json!({"role": "SRE", "interview_type": "technical", "difficulty": difficulty}),
                ))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "difficulty {difficulty}"
            );
            let body = extract_json(response.into_body()).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_evaluate_answer_parse_fallback() {
        let response = app_with(MockLlm::replying("Great answer!"))
            .oneshot(post_json(
                "/api/v1/answers/evaluate",
                json!({
                    "question": "Why Rust?",
                    "answer": "Memory safety.",
                    "role": "Engineer",
                    "interview_type": "technical"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["score"], 75.0);
        assert_eq!(body["feedback"], "Great answer!");
        assert_eq!(body["provenance"], "parse_fallback");
    }

    #[tokio::test]
    async fn test_feedback_lifecycle() {
        let app = app_with(MockLlm::failing());
        let interview_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let summary_uri = format!("/api/v1/feedback/{interview_id}/summary");
        let response = app.clone().oneshot(get_request(&summary_uri)).await.unwrap();
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["feedback_available"], false);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/feedback/{interview_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/v1/feedback/{interview_id}/generate"),
                feedback_body(user_id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        // 1 of 2 answered, provider down
        assert_eq!(body["overall_score"], 65.0);
        assert_eq!(body["provenance"], "fallback");
        assert_eq!(body["breakdown"]["overall"]["grade"], "D");
        assert_eq!(body["question_analysis"].as_array().unwrap().len(), 2);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/feedback/{interview_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(get_request(&summary_uri)).await.unwrap();
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["feedback_available"], true);
        assert_eq!(body["performance_level"], "Below Average");

        let response = app
            .oneshot(get_request(&format!("/api/v1/users/{user_id}/feedback-stats")))
            .await
            .unwrap();
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["total_interviews"], 1);
        assert_eq!(body["best_score"], 65.0);
    }

    #[tokio::test]
    async fn test_generate_feedback_without_questions_is_400() {
        let mut body = feedback_body(Uuid::new_v4());
        body["questions"] = json!([]);
        let response = app_with(MockLlm::failing())
            .oneshot(post_json(
                &format!("/api/v1/feedback/{}/generate", Uuid::new_v4()),
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
