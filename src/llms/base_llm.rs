//! Text-generation abstraction.
//!
//! The chat pipeline treats the language model as an opaque function from a
//! message list (system prompt first) to reply text.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::GenerationError;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Chat-completion message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        })
    }
}

/// A single message in a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    pub role: Role,
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// ---------------------------------------------------------------------------
// TextGenerator trait
// ---------------------------------------------------------------------------

/// A language model that turns a conversation into reply text.
///
/// Implementations own their transport, timeouts and retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the next assistant reply.
    async fn generate(&self, messages: &[LLMMessage]) -> Result<String, GenerationError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let message = LLMMessage::system("hola");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            serde_json::json!({"role": "system", "content": "hola"})
        );
        assert_eq!(LLMMessage::assistant("x").role, Role::Assistant);
        assert_eq!(Role::User.to_string(), "user");
    }
}
