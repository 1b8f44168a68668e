use serde::{Deserialize, Serialize};

/// Successful reply of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    /// RFC 3339 / ISO-8601 UTC timestamp of the generation
    pub timestamp: String,
    pub session_id: String,
}

/// Error payload shared by every non-success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "OK".to_string(),
            message: message.into(),
        }
    }
}
