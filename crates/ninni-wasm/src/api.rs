use gloo_net::http::Request;
use ninni_chat::ReplyOutcome;
use ninni_models::ChatRequest;

use crate::utils;

/// POST one chat request and classify the response
///
/// Never fails: network errors and unreadable bodies become
/// [`ReplyOutcome::TransportFailed`].
pub async fn send_chat(api_base: &str, request: &ChatRequest) -> ReplyOutcome {
    let url = utils::api_url(api_base, "/api/chat");

    let request = match Request::post(&url).json(request) {
        Ok(request) => request,
        Err(e) => return ReplyOutcome::TransportFailed(format!("Failed to serialize request: {:?}", e)),
    };

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return ReplyOutcome::TransportFailed(format!("Request failed: {:?}", e)),
    };

    let status = response.status();
    match response.text().await {
        Ok(body) => ReplyOutcome::classify(status, &body),
        Err(e) => ReplyOutcome::TransportFailed(format!("Failed to read response: {:?}", e)),
    }
}
