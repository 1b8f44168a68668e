//! Client-side chat state shared by the browser front end and the terminal
//! client.
//!
//! The state machine is deliberately free of I/O: callers feed it user input
//! and the outcome of each HTTP exchange, and it tells them which request to
//! send and which UI effects to apply.

pub mod message;
pub mod outcome;
pub mod state;

pub use message::{Message, Sender};
pub use outcome::ReplyOutcome;
pub use state::{new_session_id, ChatState, Phase, UiEffect};

/// First assistant message shown on every page load
pub const DEFAULT_GREETING: &str =
    "Hello sweetheart! I'm Ninni, your gentle sleep companion. How can I help you drift into dreamland tonight? 🌙";

/// Shown when the server rejects a request without an error text
pub const SLEEPY_FALLBACK: &str = "Sorry, I'm feeling a bit sleepy. Try again? 😴";

/// Shown when the server could not be reached or answered garbage
pub const DOZED_OFF_FALLBACK: &str =
    "Oops! I seem to have dozed off. Please make sure the server is running! 💤";
