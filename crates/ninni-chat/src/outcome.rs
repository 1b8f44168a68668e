use ninni_models::ChatReply;

/// Result of one `POST /api/chat` exchange as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// 2xx with a well-formed reply body
    Reply(ChatReply),
    /// Non-success status with a JSON body; `error` is the server's text if any
    Rejected { error: Option<String> },
    /// Network failure or a body that could not be understood
    TransportFailed(String),
}

impl ReplyOutcome {
    /// Classify a completed HTTP response
    pub fn classify(status: u16, body: &str) -> Self {
        if (200..300).contains(&status) {
            return match serde_json::from_str::<ChatReply>(body) {
                Ok(reply) => ReplyOutcome::Reply(reply),
                Err(e) => ReplyOutcome::TransportFailed(format!("malformed reply: {}", e)),
            };
        }

        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => ReplyOutcome::Rejected {
                error: value
                    .get("error")
                    .and_then(|error| error.as_str())
                    .filter(|error| !error.is_empty())
                    .map(str::to_string),
            },
            Err(e) => ReplyOutcome::TransportFailed(format!("HTTP {} with unreadable body: {}", status, e)),
        }
    }
}
