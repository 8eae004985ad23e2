//! Mock tests for the query API client
//!
//! These tests use WireMock to simulate the backend and verify that the
//! client sends the documented requests and classifies every failure mode.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::core::{QueryTransport, ServiceClient};
    use crate::error::{ErrorKind, ServiceError};
    use crate::models::AdaptationAction;
    use crate::services::query::{QueryApiClient, REQUEST_ID_HEADER};

    /// Creates a test client configured to use the mock server
    fn create_test_client(mock_server: &MockServer) -> QueryApiClient {
        crate::client()
            .base_url(format!("{}/", mock_server.uri()))
            .timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build query client")
    }

    fn sample_response(retry_count: u32) -> serde_json::Value {
        json!({
            "question": "Explain vector databases",
            "intent": "summary",
            "sub_tasks": ["define", "compare"],
            "answer": "Vector databases index embeddings.",
            "passages": [{"text": "Embeddings ...", "score": 0.7}],
            "evaluation": {"scores": {"coverage": 0.4}, "global_score": 0.5, "issues": [], "recommendations": []},
            "can_retry": retry_count == 0,
            "retry_count": retry_count,
            "adaptation_actions": [{"name": "increase_top_k", "reason": "coverage", "patch": {"top_k": 10}}]
        })
    }

    #[tokio::test]
    async fn test_submit_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/query"))
            .and(body_json(json!({"question": "Explain vector databases"})))
            .and(header_exists(REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(0)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let response = client.submit_query("Explain vector databases").await.unwrap();

        assert_eq!(response.answer, "Vector databases index embeddings.");
        assert_eq!(response.retry_count, Some(0));
        assert_eq!(client.metrics()["success_count"], "1");
    }

    #[tokio::test]
    async fn test_submit_retry_sends_actions_and_trusts_server_count() {
        let mock_server = MockServer::start().await;

        let actions = vec![AdaptationAction {
            name: "increase_top_k".to_string(),
            reason: Some("coverage".to_string()),
            patch: json!({"top_k": 10}).as_object().cloned(),
        }];

        Mock::given(method("POST"))
            .and(path("/api/query/retry"))
            .and(body_json(json!({
                "question": "Explain vector databases",
                "retry_count": 0,
                "adaptation_actions": [{"name": "increase_top_k", "reason": "coverage", "patch": {"top_k": 10}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(1)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let response = client
            .submit_retry("Explain vector databases", 0, &actions)
            .await
            .unwrap();

        assert_eq!(response.retry_count, Some(1));
        assert_eq!(response.can_retry, Some(false));
    }

    #[tokio::test]
    async fn test_fetch_graph() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/graph/full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nodes": [{"id": "rag", "label": "RAG", "type": "concept"}],
                "edges": [{"source": "rag", "target": "llm", "relation": "uses", "weight": 1.0}]
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let payload = client.fetch_graph().await.unwrap();

        assert_eq!(payload.node_entries().len(), 1);
        assert_eq!(payload.edge_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_graph_tolerates_odd_shapes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/graph/full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": null})))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let payload = client.fetch_graph().await.unwrap();

        assert!(payload.node_entries().is_empty());
        assert!(payload.edge_entries().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_subgraph() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/graph/subgraph"))
            .and(query_param("hops", "2"))
            .and(body_json(json!(["RAG", "LLM"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": [], "edges": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let seeds = vec!["RAG".to_string(), "LLM".to_string()];
        let payload = client.fetch_subgraph(&seeds, 2).await.unwrap();

        assert!(payload.node_entries().is_empty());
    }

    #[tokio::test]
    async fn test_missing_graph_endpoint_is_reportable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/graph/full"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not Found"})))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let error = client.fetch_graph().await.unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Not found: graph endpoint not available");
        assert_eq!(error.endpoint(), Some("api/graph/full"));
        assert_eq!(error.status_code(), Some(404));
        assert!(error.request_id().is_some());
    }

    #[tokio::test]
    async fn test_server_error_surfaces_detail_without_retrying() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "LLM unavailable"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let error = client.submit_query("Explain vector databases").await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Protocol);
        assert_eq!(error.status_code(), Some(500));
        assert!(error.to_string().contains("LLM unavailable"));
        assert_eq!(client.metrics()["error_count"], "1");
    }

    #[tokio::test]
    async fn test_unexpected_body_is_protocol_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let error = client.submit_query("Explain vector databases").await.unwrap_err();

        assert!(error.is_protocol());
        assert!(matches!(error.root(), ServiceError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 1
        let client = crate::client()
            .base_url("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let error = client.submit_query("Explain vector databases").await.unwrap_err();

        assert!(error.is_network());
        assert_eq!(error.endpoint(), Some("api/query"));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_response(0))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = crate::client()
            .base_url(mock_server.uri())
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        let error = client.submit_query("Explain vector databases").await.unwrap_err();

        assert!(error.is_network());
        assert!(matches!(error.root(), ServiceError::Timeout(_)));
    }

    #[test]
    fn test_client_identity() {
        let client = crate::client().base_url("http://qa.local:7000/").build().unwrap();

        assert_eq!(client.name(), "qa-backend");
        assert_eq!(client.base_url(), "http://qa.local:7000");
        assert_eq!(client.metrics()["request_count"], "0");
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = crate::client().base_url("localhost:7000").build();
        assert!(result.is_err());
    }
}
