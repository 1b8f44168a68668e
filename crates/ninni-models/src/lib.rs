// Models module - data structures shared by the server and its clients
pub mod types;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use types::{Role, Turn, GenerationConfig};
pub use requests::ChatRequest;
pub use responses::{ChatReply, ErrorBody, HealthStatus};
