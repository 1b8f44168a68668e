use async_trait::async_trait;
use ninni_models::{GenerationConfig, Turn};
use serde::{Deserialize, Serialize};

use crate::config::BackendType;
use crate::error::LlmError;

pub mod gemini;
pub mod openai;

/// Everything a backend needs to produce the next model turn
///
/// `history` holds the whole conversation so far, ending with the user turn
/// that is being answered.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub system_instruction: Option<&'a str>,
    pub history: &'a [Turn],
    pub config: &'a GenerationConfig,
}

/// LLM client trait - unified interface for all providers
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate the next model turn for a conversation (non-streaming)
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, LlmError>;

    /// List the models visible to the configured credential
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        Err(LlmError::Unsupported(self.backend().as_str()))
    }

    /// Backend this client talks to
    fn backend(&self) -> BackendType;

    /// Model name requests are sent to
    fn model(&self) -> &str;
}

/// LLM response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A model advertised by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == "generateContent")
    }
}
