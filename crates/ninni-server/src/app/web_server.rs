use anyhow::Result;

use crate::config::ServerConfig;
use crate::web::WebServer;

/// Run the web server
pub async fn run_web_server(config: ServerConfig) -> Result<()> {
    tracing::info!(
        addr = %config.bind_addr,
        backend = %config.backend,
        model = %config.model,
        max_sessions = config.max_sessions,
        idle_secs = config.session_idle.as_secs(),
        anonymous_sessions = config.anonymous_sessions.as_str(),
        "Starting Ninni server"
    );

    let server = WebServer::new(config)?;
    server.start().await?;

    Ok(())
}
