use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only conversation for the lifetime of the window.
#[derive(Debug, Clone, Default)]
pub struct ChatThread {
    messages: Vec<ChatMessage>,
    typing: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
}

impl ChatThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.typing = false;
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.messages.clone(),
            typing: self.typing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_insertion_order_and_unique_ids() {
        let mut thread = ChatThread::new();
        let first = thread.push(Role::User, "hi").id.clone();
        let second = thread.push(Role::Assistant, "hello").id.clone();

        assert_ne!(first, second);
        let roles: Vec<_> = thread.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert!(thread.messages()[0].timestamp <= thread.messages()[1].timestamp);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let mut thread = ChatThread::new();
        thread.set_typing(true);
        let json = serde_json::to_value(thread.snapshot()).unwrap();
        assert_eq!(json["typing"], true);
        assert!(json["messages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn clear_empties_and_stops_typing() {
        let mut thread = ChatThread::new();
        thread.push(Role::User, "hi");
        thread.set_typing(true);

        thread.clear();

        assert!(thread.messages().is_empty());
        assert!(!thread.is_typing());
    }
}
