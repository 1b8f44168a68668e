use async_trait::async_trait;
use ninni_models::Role;
use serde_json::json;

use crate::client::{GenerateRequest, LlmClient, LlmResponse, TokenUsage};
use crate::config::BackendType;
use crate::error::LlmError;

const BACKEND: &str = "openai";

/// OpenAI-compatible chat completions client (OpenAI, Groq, llama.cpp, ...)
pub struct OpenAiClient {
    api_key: String,
    model: String,
    api_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_url: String) -> Self {
        Self::with_http_client(api_key, model, api_url, reqwest::Client::new())
    }

    pub fn with_http_client(
        api_key: String,
        model: String,
        api_url: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key,
            model,
            api_url,
            client,
        }
    }

    fn build_request(&self, request: &GenerateRequest<'_>) -> serde_json::Value {
        let mut messages = Vec::with_capacity(request.history.len() + 1);
        if let Some(instruction) = request.system_instruction {
            messages.push(json!({ "role": "system", "content": instruction }));
        }
        for turn in request.history {
            let role = match turn.role {
                Role::User => "user",
                Role::Model => "assistant",
            };
            messages.push(json!({ "role": role, "content": turn.text }));
        }

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.config.temperature,
            "max_tokens": request.config.max_output_tokens,
        });
        if let Some(top_p) = request.config.top_p {
            body["top_p"] = json!(top_p);
        }
        body
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, LlmError> {
        let body = self.build_request(&request);
        tracing::debug!(model = %self.model, turns = request.history.len(), "sending chat completion request");

        let mut builder = self.client.post(&self.api_url).json(&body);
        // Self-hosted servers commonly run without a key
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(error_text);
            return Err(LlmError::Api {
                backend: BACKEND,
                status: status.as_u16(),
                message,
            });
        }

        let response_text = response.text().await?;
        let chat_response: serde_json::Value = serde_json::from_str(&response_text)?;

        let choice = &chat_response["choices"][0];
        let text = choice["message"]["content"]
            .as_str()
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)?
            .to_string();

        let usage = chat_response.get("usage").and_then(parse_usage);

        Ok(LlmResponse {
            text,
            usage,
            finish_reason: choice["finish_reason"].as_str().map(str::to_string),
        })
    }

    fn backend(&self) -> BackendType {
        BackendType::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Token counts that are missing or do not fit in a `u32` yield no usage at all
fn parse_usage(usage: &serde_json::Value) -> Option<TokenUsage> {
    let count = |key: &str| u32::try_from(usage[key].as_u64()?).ok();
    Some(TokenUsage {
        prompt_tokens: count("prompt_tokens")?,
        completion_tokens: count("completion_tokens")?,
        total_tokens: count("total_tokens")?,
    })
}
