#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
    #[error("Rate limit error: {0}")]
    RateLimitError(String),
    #[error("API error: {0}")]
    APIError(String),
}
