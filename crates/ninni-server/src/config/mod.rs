pub mod persona;

pub use persona::{PersonaConfig, DEFAULT_SYSTEM_INSTRUCTION};

use anyhow::Result;
use ninni_llm_api::BackendType;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Session id used for requests that do not carry one under the shared policy
pub const DEFAULT_SESSION_ID: &str = "default";

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// How a chat request without a `sessionId` is mapped to a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AnonymousSessions {
    /// Every anonymous request joins the single `"default"` conversation
    #[default]
    Shared,
    /// Every anonymous request gets a fresh conversation of its own
    Isolated,
}

impl AnonymousSessions {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnonymousSessions::Shared => "shared",
            AnonymousSessions::Isolated => "isolated",
        }
    }

    /// Pick the session id for a request; only an absent id counts as omitted.
    ///
    /// Returns the id and whether it was assigned by the server.
    pub fn resolve(&self, requested: Option<String>) -> (String, bool) {
        match requested {
            Some(id) => (id, false),
            None => match self {
                AnonymousSessions::Shared => (DEFAULT_SESSION_ID.to_string(), true),
                AnonymousSessions::Isolated => (format!("anon_{}", Uuid::new_v4()), true),
            },
        }
    }
}

/// Fully resolved configuration of the chat server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendType,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: String,
    pub persona: PersonaConfig,
    pub max_sessions: usize,
    pub session_idle: Duration,
    pub anonymous_sessions: AnonymousSessions,
    pub web_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            backend: BackendType::Gemini,
            api_key: None,
            api_url: None,
            model: BackendType::Gemini.default_model().to_string(),
            persona: PersonaConfig::default(),
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            anonymous_sessions: AnonymousSessions::default(),
            web_dir: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_sessions > 0, "--max-sessions must be at least 1");
        anyhow::ensure!(
            !self.session_idle.is_zero(),
            "--session-idle-secs must be at least 1"
        );
        anyhow::ensure!(
            !self.request_timeout.is_zero(),
            "--request-timeout-secs must be at least 1"
        );
        Ok(())
    }

    /// How often idle sessions are swept: a tenth of the idle TTL, clamped to 1s..60s
    pub fn sweep_interval(&self) -> Duration {
        (self.session_idle / 10).clamp(Duration::from_secs(1), Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_policy_uses_default_session() {
        let (id, assigned) = AnonymousSessions::Shared.resolve(None);
        assert_eq!(id, "default");
        assert!(assigned);
    }

    #[test]
    fn empty_id_is_a_session_of_its_own() {
        for policy in [AnonymousSessions::Shared, AnonymousSessions::Isolated] {
            let (id, assigned) = policy.resolve(Some(String::new()));
            assert_eq!(id, "");
            assert!(!assigned);
        }
    }

    #[test]
    fn isolated_policy_generates_unique_ids() {
        let (first, _) = AnonymousSessions::Isolated.resolve(None);
        let (second, _) = AnonymousSessions::Isolated.resolve(None);
        assert!(first.starts_with("anon_"));
        assert_ne!(first, second);
    }

    #[test]
    fn explicit_id_is_kept_verbatim() {
        for policy in [AnonymousSessions::Shared, AnonymousSessions::Isolated] {
            let (id, assigned) = policy.resolve(Some("session_42".to_string()));
            assert_eq!(id, "session_42");
            assert!(!assigned);
        }
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = ServerConfig {
            max_sessions: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn sweep_interval_is_clamped() {
        let short = ServerConfig {
            session_idle: Duration::from_secs(3),
            ..ServerConfig::default()
        };
        assert_eq!(short.sweep_interval(), Duration::from_secs(1));
        assert_eq!(ServerConfig::default().sweep_interval(), Duration::from_secs(60));
    }
}
