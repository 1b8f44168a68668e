use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{gemini::GeminiClient, openai::OpenAiClient, LlmClient};
use crate::config::{get_default_url_for_backend, normalize_api_url, BackendType};
use crate::error::LlmError;

/// Client factory for creating LLM clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create an LLM client based on the specified backend type
    ///
    /// # Arguments
    /// * `backend` - The backend type to use
    /// * `api_key` - API key; falls back to the backend's environment variable.
    ///   A missing key is not an error here, it surfaces on the first call.
    /// * `model` - Model name to use (backend default if empty)
    /// * `api_url` - Optional custom API URL (uses default if None)
    /// * `timeout` - Optional per-request timeout
    ///
    /// # Returns
    /// Arc-wrapped LLM client implementing the LlmClient trait
    pub fn create(
        backend: BackendType,
        api_key: Option<String>,
        model: String,
        api_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn LlmClient>, LlmError> {
        let key = api_key
            .or_else(|| env::var(backend.api_key_env()).ok())
            .unwrap_or_default();
        let model = if model.trim().is_empty() {
            backend.default_model().to_string()
        } else {
            model
        };

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            http = http.timeout(timeout);
        }
        let http = http.build()?;

        let client: Arc<dyn LlmClient> = match backend {
            BackendType::Gemini => {
                let url = api_url.unwrap_or_else(|| get_default_url_for_backend(backend).to_string());
                Arc::new(GeminiClient::with_http_client(key, model, url, http))
            }
            BackendType::OpenAi => {
                let url = api_url
                    .map(|url| normalize_api_url(&url))
                    .unwrap_or_else(|| get_default_url_for_backend(backend).to_string());
                Arc::new(OpenAiClient::with_http_client(key, model, url, http))
            }
        };

        Ok(client)
    }
}
