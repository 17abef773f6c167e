//! Canonicalize caller input into complete messages.

use crate::types::{ConversationInput, Message, PartialMessage};

/// Normalize any accepted input shape into an ordered list of complete messages.
///
/// A missing `role` becomes `user` and a missing `type` becomes `text`; nothing
/// else is touched. The returned messages are owned copies, so appending to
/// them never affects the caller's input.
pub fn normalize(input: &ConversationInput) -> Vec<Message> {
    match input {
        ConversationInput::Text(text) => vec![Message::user(text.as_str())],
        ConversationInput::Sequence(messages) => normalize_prompts(messages),
        ConversationInput::Single(message) => vec![complete(message)],
    }
}

/// Fill defaults on each message of a list, preserving order.
pub fn normalize_prompts(prompts: &[PartialMessage]) -> Vec<Message> {
    prompts.iter().map(complete).collect()
}

fn complete(message: &PartialMessage) -> Message {
    Message {
        role: message.role.unwrap_or_default(),
        kind: message.kind.unwrap_or_default(),
        content: message.content.clone(),
    }
}
