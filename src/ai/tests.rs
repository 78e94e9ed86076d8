#[cfg(test)]
mod tests {
    use crate::ai::{AIError, CompletionClient, TextCompletion};
    use crate::config::{AIConfig, AIProvider};
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    async fn setup_test_server(provider: AIProvider) -> (ServerGuard, CompletionClient) {
        let server = Server::new_async().await;
        let path = match provider {
            AIProvider::OpenAI => "/v1/chat/completions",
            AIProvider::Anthropic => "/v1/messages",
        };

        let config = AIConfig {
            provider,
            model: "test-model".to_string(),
            max_tokens: 256,
            openai_api_key: Some("test_key".to_string()),
            anthropic_api_key: Some("test_key".to_string()),
            api_url: Some(format!("{}{}", server.url(), path)),
        };

        (server, CompletionClient::new(config))
    }

    #[tokio::test]
    async fn test_openai_successful_response() {
        let (mut server, client) = setup_test_server(AIProvider::OpenAI).await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test_key")
            .match_body(Matcher::PartialJson(json!({
                "model": "test-model",
                "messages": [{"role": "user", "content": "summarize"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "#comment tidy up\n- one"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = client.complete("summarize").await.unwrap();
        assert_eq!(result.as_deref(), Some("#comment tidy up\n- one"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_anthropic_successful_response() {
        let (mut server, client) = setup_test_server(AIProvider::Anthropic).await;

        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test_key")
            .match_header("anthropic-version", "2023-06-01")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"content": [{"type": "text", "text": "  #comment hi  "}]}).to_string())
            .create_async()
            .await;

        let result = client.complete("hello").await.unwrap();
        assert_eq!(result.as_deref(), Some("#comment hi"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let (mut server, client) = setup_test_server(AIProvider::OpenAI).await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let result = client.complete("anything").await;
        assert!(matches!(result, Err(AIError::AuthenticationError(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let (mut server, client) = setup_test_server(AIProvider::OpenAI).await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .expect(1)
            .create_async()
            .await;

        let result = client.complete("anything").await;
        assert!(matches!(result, Err(AIError::RateLimitError(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error() {
        let (mut server, client) = setup_test_server(AIProvider::Anthropic).await;

        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        match client.complete("anything").await {
            Err(AIError::APIError(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_no_result() {
        let (mut server, client) = setup_test_server(AIProvider::OpenAI).await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        assert_eq!(client.complete("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let (mut server, client) = setup_test_server(AIProvider::OpenAI).await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        assert!(matches!(
            client.complete("anything").await,
            Err(AIError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let (_server, mut client) = setup_test_server(AIProvider::OpenAI).await;
        client.reset_credentials(None);

        assert!(matches!(
            client.complete("anything").await,
            Err(AIError::ValidationError(_))
        ));
    }
}
