use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
///
/// Both fields are optional on the wire: a missing `message` is reported as a
/// validation error by the server, a missing `sessionId` is resolved by the
/// server's anonymous-session policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            session_id: Some(session_id.into()),
        }
    }

    /// The message text if it is present and not blank
    pub fn non_blank_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_id_in_camel_case() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message":"hi","sessionId":"session_1"}"#).unwrap();
        assert_eq!(request.session_id.as_deref(), Some("session_1"));
        assert_eq!(request.non_blank_message(), Some("hi"));
    }

    #[test]
    fn blank_and_missing_messages_are_rejected() {
        let missing: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.non_blank_message(), None);

        let blank: ChatRequest = serde_json::from_str(r#"{"message":"  \n\t"}"#).unwrap();
        assert_eq!(blank.non_blank_message(), None);
    }

    #[test]
    fn null_message_is_treated_as_missing() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":null}"#).unwrap();
        assert_eq!(request.non_blank_message(), None);
    }
}
