use thiserror::Error;

/// Errors raised during the SSO login flow.
///
/// Every variant is fatal; the flow is a single linear dance with no retry
/// or recovery path.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login request failed with status {0}")]
    Status(u16),
    #[error("No hidden form fields found on the login page")]
    MissingLoginForm,
    #[error("Redirect response carried no Location header")]
    MissingLocation,
    #[error("No authorization code in redirect location: {0}")]
    MissingCode(String),
    #[error("OAuth state mismatch: expected {expected}, got {returned}")]
    StateMismatch { expected: String, returned: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<url::ParseError> for AuthError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidResponse(format!("invalid redirect location: {error}"))
    }
}
