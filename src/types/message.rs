//! Message types exchanged with a language model backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Conversation role.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
}

/// Kind of content carried by a message.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromptType {
    #[default]
    Text,
    Image,
    Audio,
}

/// A complete, normalized message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    #[serde(rename = "type")]
    pub kind: PromptType,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            kind: PromptType::Text,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

/// A message as a caller may supply it, with `role` and `type` optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PromptType>,
    #[serde(default)]
    pub content: String,
}

impl PartialMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            role: None,
            kind: None,
            content: content.into(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_kind(mut self, kind: PromptType) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl From<Message> for PartialMessage {
    fn from(message: Message) -> Self {
        Self {
            role: Some(message.role),
            kind: Some(message.kind),
            content: message.content,
        }
    }
}

/// Caller-supplied conversation, resolved once at the normalizer boundary.
///
/// Deserializing never fails: JSON that is neither a string nor an array is
/// read as a single message, keeping whichever fields are well formed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged, from = "Value")]
pub enum ConversationInput {
    /// A bare prompt, sent as a single user text message.
    Text(String),
    /// An ordered list of messages.
    Sequence(Vec<PartialMessage>),
    /// A single message object.
    Single(PartialMessage),
}

impl From<Value> for ConversationInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Sequence(items.iter().map(lenient_message).collect()),
            other => Self::Single(lenient_message(&other)),
        }
    }
}

fn lenient_message(value: &Value) -> PartialMessage {
    let Some(fields) = value.as_object() else {
        return PartialMessage::default();
    };
    PartialMessage {
        role: fields.get("role").and_then(|v| Role::deserialize(v).ok()),
        kind: fields.get("type").and_then(|v| PromptType::deserialize(v).ok()),
        content: fields
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

impl From<&str> for ConversationInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ConversationInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<PartialMessage> for ConversationInput {
    fn from(message: PartialMessage) -> Self {
        Self::Single(message)
    }
}

impl From<Vec<PartialMessage>> for ConversationInput {
    fn from(messages: Vec<PartialMessage>) -> Self {
        Self::Sequence(messages)
    }
}

impl From<Message> for ConversationInput {
    fn from(message: Message) -> Self {
        Self::Single(message.into())
    }
}

impl From<Vec<Message>> for ConversationInput {
    fn from(messages: Vec<Message>) -> Self {
        Self::Sequence(messages.into_iter().map(PartialMessage::from).collect())
    }
}

impl From<&[Message]> for ConversationInput {
    fn from(messages: &[Message]) -> Self {
        Self::Sequence(messages.iter().cloned().map(PartialMessage::from).collect())
    }
}
