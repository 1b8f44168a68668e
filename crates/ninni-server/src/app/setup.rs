use anyhow::{Context, Result};
use ninni_llm_api::BackendType;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::cli::{ProviderArgs, ServeArgs};
use crate::config::{PersonaConfig, ServerConfig};

/// Set up server configuration from CLI arguments
pub fn setup_from_cli(args: &ServeArgs) -> Result<ServerConfig> {
    let ip: IpAddr = args
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", args.bind))?;

    let persona = match &args.persona_file {
        Some(path) => {
            let persona = PersonaConfig::load(path)?;
            tracing::info!(name = %persona.name, "Loaded persona from {}", path.display());
            persona
        }
        None => PersonaConfig::default(),
    };

    let provider = &args.provider;
    let api_key = resolve_api_key(provider);
    if api_key.is_none() {
        match provider.backend {
            BackendType::Gemini => tracing::warn!(
                "No API key configured (--api-key, NINNI_API_KEY or {}); chat requests will fail",
                provider.backend.api_key_env()
            ),
            BackendType::OpenAi => {
                tracing::info!("No API key configured; sending unauthenticated requests")
            }
        }
    }

    let config = ServerConfig {
        bind_addr: SocketAddr::new(ip, args.port),
        backend: provider.backend,
        api_key,
        api_url: provider.api_url.clone(),
        model: resolve_model(provider),
        persona,
        max_sessions: args.max_sessions,
        session_idle: Duration::from_secs(args.session_idle_secs),
        anonymous_sessions: args.anonymous_sessions,
        web_dir: args.web_dir.clone(),
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };
    config.validate()?;

    Ok(config)
}

/// Explicit key first, then the backend's own environment variable
pub fn resolve_api_key(provider: &ProviderArgs) -> Option<String> {
    provider
        .api_key
        .clone()
        .or_else(|| env::var(provider.backend.api_key_env()).ok())
        .filter(|key| !key.trim().is_empty())
}

pub(crate) fn resolve_model(provider: &ProviderArgs) -> String {
    provider
        .model
        .clone()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| provider.backend.default_model().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::config::AnonymousSessions;
    use clap::Parser;
    use std::io::Write;

    fn serve_args(extra: &[&str]) -> ServeArgs {
        let mut argv = vec!["ninni", "serve", "--api-key", "test-key"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().effective_command() {
            Commands::Serve(args) => args,
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn builds_config_from_flags() {
        let config = setup_from_cli(&serve_args(&[
            "--bind",
            "0.0.0.0",
            "--port",
            "8080",
            "--session-idle-secs",
            "90",
            "--anonymous-sessions",
            "isolated",
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.session_idle, Duration::from_secs(90));
        assert_eq!(config.anonymous_sessions, AnonymousSessions::Isolated);
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.persona.name, "Ninni");
    }

    #[test]
    fn ipv6_bind_address_is_accepted() {
        let config = setup_from_cli(&serve_args(&["--bind", "::1", "--port", "3001"])).unwrap();
        assert!(config.bind_addr.is_ipv6());
    }

    #[test]
    fn invalid_bind_address_is_an_error() {
        assert!(setup_from_cli(&serve_args(&["--bind", "not-an-ip"])).is_err());
    }

    #[test]
    fn default_model_follows_backend() {
        let gemini = setup_from_cli(&serve_args(&["--backend", "gemini"])).unwrap();
        assert_eq!(gemini.model, "models/gemini-2.5-flash");

        let openai = setup_from_cli(&serve_args(&["--backend", "openai", "--model", "llama3"])).unwrap();
        assert_eq!(openai.model, "llama3");
    }

    #[test]
    fn persona_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = \"Luna\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = setup_from_cli(&serve_args(&["--persona-file", path.as_str()])).unwrap();
        assert_eq!(config.persona.name, "Luna");
    }
}
