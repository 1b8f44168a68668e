use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::client::{GenerateRequest, LlmClient, LlmResponse, ModelInfo, TokenUsage};
use crate::config::BackendType;
use crate::error::LlmError;

const BACKEND: &str = "gemini";

/// Google Gemini client using the `generateContent` REST endpoint
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self::with_http_client(api_key, model, base_url, reqwest::Client::new())
    }

    pub fn with_http_client(
        api_key: String,
        model: String,
        base_url: String,
        client: reqwest::Client,
    ) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            api_key,
            model,
            base_url,
            client,
        }
    }

    /// Model resource name, always in the `models/<id>` form
    fn model_resource(&self) -> String {
        format!("models/{}", self.model.trim_start_matches("models/"))
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/{}:generateContent", self.base_url, self.model_resource())
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    fn ensure_api_key(&self) -> Result<(), LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(BACKEND));
        }
        Ok(())
    }

    fn build_request(request: &GenerateRequest<'_>) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .history
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.as_str(),
                    "parts": [{ "text": turn.text }]
                })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": request.config,
        });

        if let Some(instruction) = request.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        body
    }

    async fn error_from_response(response: reqwest::Response) -> LlmError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        LlmError::Api {
            backend: BACKEND,
            status,
            message,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, LlmError> {
        self.ensure_api_key()?;

        let body = Self::build_request(&request);
        tracing::debug!(model = %self.model, turns = request.history.len(), "sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let response_text = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)?;
        parsed.into_llm_response()
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        self.ensure_api_key()?;

        let response = self
            .client
            .get(self.models_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let response_text = response.text().await?;
        let listing: ModelListing = serde_json::from_str(&response_text)?;
        Ok(listing.models)
    }

    fn backend(&self) -> BackendType {
        BackendType::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ModelListing {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    fn into_llm_response(self) -> Result<LlmResponse, LlmError> {
        let usage = self.usage_metadata.map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        });

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => LlmError::Blocked(reason),
                None => LlmError::EmptyResponse,
            });
        };

        let finish_reason = candidate.finish_reason;
        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(match finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    LlmError::Blocked(reason.to_string())
                }
                _ => LlmError::EmptyResponse,
            });
        }

        Ok(LlmResponse {
            text,
            usage,
            finish_reason,
        })
    }
}
