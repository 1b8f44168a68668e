use anyhow::{Context, Result};
use colored::Colorize;
use ninni_llm_api::ClientFactory;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::web::{routes, session_manager::SessionManager};

/// Web server instance
pub struct WebServer {
    config: ServerConfig,
    state: routes::AppState,
}

impl WebServer {
    /// Create a new web server, building the upstream client from `config`
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let llm = ClientFactory::create(
            config.backend,
            config.api_key.clone(),
            config.model.clone(),
            config.api_url.clone(),
            Some(config.request_timeout),
        )
        .context("Failed to create LLM client")?;

        let state = routes::AppState {
            sessions: Arc::new(SessionManager::new(config.max_sessions, config.session_idle)),
            llm,
            persona: Arc::new(config.persona.clone()),
            anonymous_sessions: config.anonymous_sessions,
        };

        Ok(Self { config, state })
    }

    /// Build the full application router with middleware
    pub fn router(&self) -> axum::Router {
        let mut app = routes::create_router(self.state.clone());

        // Serve the wasm bundle if web_dir is provided
        if let Some(web_dir) = &self.config.web_dir {
            if web_dir.exists() {
                tracing::info!("Serving wasm bundle from: {}", web_dir.display());
                app = app.nest_service("/pkg", ServeDir::new(web_dir));
            } else {
                tracing::warn!("Web directory {} does not exist", web_dir.display());
            }
        }

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app = self.router();
        self.spawn_sweeper();

        let addr = self.config.bind_addr;
        println!(
            "{} {}",
            "🌙".bright_blue(),
            format!("{} is listening on http://{}", self.config.persona.name, addr)
                .bright_cyan()
                .bold()
        );
        println!("   Chat endpoint:   POST http://{}/api/chat", addr);
        println!("   Health endpoint: GET  http://{}/api/health", addr);
        println!(
            "   Backend: {} ({})",
            self.state.llm.backend().to_string().yellow(),
            self.state.llm.model()
        );

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    fn spawn_sweeper(&self) {
        let sessions = self.state.sessions.clone();
        let period = self.config.sweep_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = sessions.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Purged idle sessions");
                }
            }
        });
    }

    /// Get the session manager
    pub fn session_manager(&self) -> Arc<SessionManager> {
        self.state.sessions.clone()
    }
}
