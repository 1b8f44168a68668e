//! Ninni chat server: a single conversational endpoint backed by a hosted
//! generative-language API and a bounded in-memory session cache.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod web;

pub use cli::{Cli, Commands};
pub use config::{AnonymousSessions, PersonaConfig, ServerConfig};
pub use web::{create_router, AppState, SessionManager, WebServer};
