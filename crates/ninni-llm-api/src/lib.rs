//! # ninni-llm-api
//!
//! A small, provider-agnostic interface to hosted generative-language APIs:
//! - Google Gemini (`generateContent`)
//! - OpenAI-compatible chat completion endpoints
//!
//! Conversation state is owned by the caller and replayed on every call, so a
//! client holds no per-conversation state of its own and can be shared freely
//! between sessions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ninni_llm_api::{BackendType, ClientFactory, GenerateRequest};
//! use ninni_models::{GenerationConfig, Turn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientFactory::create(
//!         BackendType::Gemini,
//!         Some("your-api-key".to_string()),
//!         "models/gemini-2.5-flash".to_string(),
//!         None,
//!         None,
//!     )?;
//!
//!     let history = vec![Turn::user("I can't fall asleep")];
//!     let config = GenerationConfig::default();
//!     let response = client
//!         .generate(GenerateRequest {
//!             system_instruction: Some("You are a gentle sleep companion."),
//!             history: &history,
//!             config: &config,
//!         })
//!         .await?;
//!     println!("Response: {}", response.text);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;


// Re-export commonly used types
pub use client::{
    GenerateRequest,
    LlmClient,
    LlmResponse,
    ModelInfo,
    TokenUsage,
};

pub use config::{
    BackendType,
    ClientFactory,
    GEMINI_API_URL,
    OPENAI_API_URL,
    DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENAI_MODEL,
    normalize_api_url,
    get_default_url_for_backend,
};

pub use error::LlmError;
