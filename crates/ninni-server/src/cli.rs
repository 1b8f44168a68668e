use clap::{Args, Parser, Subcommand};
use ninni_llm_api::BackendType;
use std::path::PathBuf;

use crate::config::{
    AnonymousSessions, DEFAULT_MAX_SESSIONS, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SESSION_IDLE_SECS,
};

/// CLI arguments for ninni
///
/// Running `ninni` without a subcommand starts the server with the top-level
/// flags, the same as `ninni serve`.
#[derive(Parser, Debug)]
#[command(name = "ninni")]
#[command(about = "Ninni - a gentle sleep companion chatbot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub serve: ServeArgs,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The command to run, `serve` when none was given
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(self.serve.clone()))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the chat HTTP server
    Serve(ServeArgs),
    /// Chat with a running server from the terminal
    Chat(ChatArgs),
    /// List models available to the configured API key
    Models(ModelsArgs),
}

/// Which generative-language backend to talk to
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Backend: gemini or openai (any OpenAI-compatible server)
    #[arg(long, env = "NINNI_BACKEND", default_value = "gemini")]
    pub backend: BackendType,

    /// API key; falls back to GEMINI_API_KEY or OPENAI_API_KEY by backend
    #[arg(long, env = "NINNI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Custom API base URL (e.g., http://localhost:8080 for llama.cpp)
    #[arg(long, env = "NINNI_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Model name (defaults to models/gemini-2.5-flash for gemini)
    #[arg(long, env = "NINNI_MODEL", value_name = "MODEL")]
    pub model: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "NINNI_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    #[command(flatten)]
    pub provider: ProviderArgs,

    /// TOML file overriding the persona and generation parameters
    #[arg(long, env = "NINNI_PERSONA_FILE", value_name = "PATH")]
    pub persona_file: Option<PathBuf>,

    /// Maximum number of conversations kept in memory
    #[arg(long, env = "NINNI_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Seconds of inactivity after which a conversation is dropped
    #[arg(long, env = "NINNI_SESSION_IDLE_SECS", default_value_t = DEFAULT_SESSION_IDLE_SECS)]
    pub session_idle_secs: u64,

    /// What to do with requests that carry no session id
    #[arg(
        long,
        env = "NINNI_ANONYMOUS_SESSIONS",
        value_enum,
        default_value_t = AnonymousSessions::Shared
    )]
    pub anonymous_sessions: AnonymousSessions,

    /// Directory holding the wasm bundle served under /pkg
    #[arg(long, env = "NINNI_WEB_DIR", value_name = "DIR")]
    pub web_dir: Option<PathBuf>,

    /// Timeout for a single upstream API call
    #[arg(long, env = "NINNI_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of the Ninni server
    #[arg(long, env = "NINNI_SERVER_URL", default_value = "http://localhost:3001")]
    pub server: String,

    /// Resume a conversation instead of starting a new one
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ModelsArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Send a short test prompt to the first model that supports generateContent
    #[arg(long)]
    pub probe: bool,
}
