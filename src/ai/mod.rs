use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::sync::OnceLock;
use std::time::Duration;

mod error;
mod tests;

pub use error::AIError;
use crate::config::{AIConfig, AIProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Anything that turns a prompt into generated text.
///
/// `Ok(None)` means the service answered but produced nothing usable.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, AIError>;
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

/// HTTP client for the configured provider.
///
/// The underlying connection pool is built on the first request and dropped
/// whenever the credential changes.
pub struct CompletionClient {
    config: AIConfig,
    http: OnceLock<reqwest::Client>,
}

impl CompletionClient {
    pub fn new(config: AIConfig) -> Self {
        Self {
            config,
            http: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }

    /// Swaps the API key for the active provider and forgets the old client.
    pub fn reset_credentials(&mut self, api_key: Option<String>) {
        self.config.set_api_key(api_key);
        self.http = OnceLock::new();
    }

    fn http(&self) -> Result<&reqwest::Client, AIError> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AIError::NetworkError(e.to_string()))?;
        Ok(self.http.get_or_init(|| client))
    }

    fn api_key(&self) -> Result<&str, AIError> {
        self.config
            .api_key()
            .ok_or_else(|| AIError::ValidationError(format!("{:?} API key not configured", self.config.provider)))
    }

    async fn complete_openai(&self, prompt: &str) -> Result<Option<String>, AIError> {
        let api_key = self.api_key()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| AIError::ValidationError(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_url = self.config.api_url.as_deref().unwrap_or(OPENAI_URL);
        let response = self
            .http()?
            .post(api_url)
            .headers(headers)
            .json(&json!({
                "model": &self.config.model,
                "max_tokens": self.config.max_tokens,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt
                    }
                ]
            }))
            .send()
            .await
            .map_err(|e| AIError::NetworkError(e.to_string()))?;

        let body = check_status(response).await?;
        let parsed: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| AIError::ParseError(format!("Failed to parse OpenAI response: {}", e)))?;

        Ok(non_empty(
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content),
        ))
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<Option<String>, AIError> {
        let api_key = self.api_key()?;

        let mut headers = HeaderMap::new();
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| AIError::ValidationError(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_url = self.config.api_url.as_deref().unwrap_or(ANTHROPIC_URL);
        let response = self
            .http()?
            .post(api_url)
            .headers(headers)
            .json(&json!({
                "model": &self.config.model,
                "max_tokens": self.config.max_tokens,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt
                    }
                ]
            }))
            .send()
            .await
            .map_err(|e| AIError::NetworkError(e.to_string()))?;

        let body = check_status(response).await?;
        let parsed: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            AIError::ParseError(format!("Failed to parse Anthropic response: {}", e))
        })?;

        Ok(non_empty(parsed.content.into_iter().last().map(|c| c.text)))
    }
}

#[async_trait]
impl TextCompletion for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, AIError> {
        tracing::debug!(provider = ?self.config.provider, model = %self.config.model, "sending completion request");
        match self.config.provider {
            AIProvider::OpenAI => self.complete_openai(prompt).await,
            AIProvider::Anthropic => self.complete_anthropic(prompt).await,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<String, AIError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => {
            return Err(AIError::AuthenticationError("Invalid API key".to_string()));
        }
        StatusCode::TOO_MANY_REQUESTS => {
            return Err(AIError::RateLimitError("Rate limit exceeded".to_string()));
        }
        status if !status.is_success() => {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(AIError::APIError(format!(
                "Unexpected status code: {} - Response: {}",
                status, error_body
            )));
        }
        _ => {}
    }

    response
        .text()
        .await
        .map_err(|e| AIError::NetworkError(format!("Failed to read response body: {}", e)))
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
