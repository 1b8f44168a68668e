pub mod models;
pub mod repl;
pub mod setup;
pub mod web_server;

pub use models::run_models_mode;
pub use repl::run_chat_repl;
pub use setup::{resolve_api_key, setup_from_cli};
pub use web_server::run_web_server;
