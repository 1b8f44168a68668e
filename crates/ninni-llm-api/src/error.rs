use thiserror::Error;

/// Errors produced while talking to a generative-language backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured for the {0} backend")]
    MissingApiKey(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{backend} API error ({status}): {message}")]
    Api {
        backend: &'static str,
        status: u16,
        message: String,
    },

    #[error("response was blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("the {0} backend does not support this operation")]
    Unsupported(&'static str),
}

impl LlmError {
    /// Whether the failure came from the remote service rather than from
    /// local configuration
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            LlmError::Http(_)
                | LlmError::Api { .. }
                | LlmError::Blocked(_)
                | LlmError::EmptyResponse
                | LlmError::InvalidResponse(_)
        )
    }
}
