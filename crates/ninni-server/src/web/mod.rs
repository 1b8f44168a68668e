// HTTP API and static front end
pub mod routes;
pub mod server;
pub mod session_manager;

pub use routes::{create_router, AppError, AppState};
pub use server::WebServer;
pub use session_manager::{Conversation, SessionManager, SharedConversation};
