#[cfg(test)]
mod analysis_handler_tests {
    use crate::api::app_state::AppState;
    use crate::api::create_router;
    use crate::config::{AnalysisConfig, ModelConfig};
    use crate::error::Result;
    use crate::llm::{ChatClient, ChatMessage};
    use crate::models::{InMemoryMessageSource, MessageRecord};
    use crate::observability::AppMetrics;
    use crate::services::{InferenceEngine, PersonalityAnalyzer};
    use crate::storage::{AnalysisCache, MemoryKvStore};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::to_bytes,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedChatClient;

    #[async_trait]
    impl ChatClient for FixedChatClient {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String> {
            if messages[0].content.contains("MBTI") {
                Ok(r#"{"mbti_type": "INFP", "confidence": 0.75,
                    "dimension_scores": {"E-I": 0.3, "S-N": 0.6, "T-F": 0.7, "J-P": 0.65}}"#
                    .to_string())
            } else {
                Ok(r#"{"openness": 70, "conscientiousness": 55, "extraversion": 40,
                    "agreeableness": 65, "neuroticism": 45}"#
                    .to_string())
            }
        }
    }

    fn test_app(message_count: usize) -> Router {
        let source = InMemoryMessageSource::new();
        let now = chrono::Utc::now().timestamp();
        for i in 0..message_count {
            source.push(MessageRecord {
                chat_key: "group_1".into(),
                sender_id: "user_1".into(),
                sender_name: "小明".into(),
                content: format!("这是第{i}条测试消息内容"),
                send_timestamp: now - i as i64 * 60,
                is_system: false,
                is_recalled: false,
            });
        }

        let metrics = Arc::new(AppMetrics::default());
        let cache = AnalysisCache::new(Arc::new(MemoryKvStore::new()), 7);
        let inference = InferenceEngine::new(
            Arc::new(FixedChatClient),
            ModelConfig::default(),
            metrics.clone(),
        );
        let analyzer = PersonalityAnalyzer::new(
            Arc::new(source),
            inference,
            cache,
            AnalysisConfig::default(),
            metrics,
        );

        create_router(AppState::new(Arc::new(analyzer)))
    }

    fn post_analysis(uri: &str, body: &str) -> Request<String> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_analysis_returns_200_with_report() {
        let app = test_app(60);
        let response = app
            .oneshot(post_analysis(
                "/api/v1/chats/group_1/users/user_1/analysis",
                "{}",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["target_username"], "小明");
        assert_eq!(json["trait_scores"]["openness"], 70);
        assert!(
            json["report_markdown"]
                .as_str()
                .unwrap()
                .contains("用户性格分析报告")
        );
    }

    #[tokio::test]
    async fn test_run_analysis_rejects_bad_days() {
        let app = test_app(60);
        let response = app
            .oneshot(post_analysis(
                "/api/v1/chats/group_1/users/user_1/analysis",
                r#"{"days": 400}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_analysis_no_messages_returns_422() {
        let app = test_app(0);
        let response = app
            .oneshot(post_analysis(
                "/api/v1/chats/group_1/users/user_1/analysis",
                "{}",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_report_returns_404_without_cache() {
        let app = test_app(60);
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/chats/group_1/users/user_1/report")
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalidate_cache_is_idempotent() {
        let app = test_app(60);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/chats/group_1/users/user_1/cache")
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["cleared"], true);
    }
}
