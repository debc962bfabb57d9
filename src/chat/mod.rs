pub mod client;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod router;
pub mod session;
pub mod thread;

pub use client::{ChatClient, ChatReply, ConversationService, LocalAssistant};
pub use session::ChatSession;
pub use thread::{ChatMessage, ChatSnapshot, ChatThread, Role};
