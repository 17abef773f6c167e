//! Convenience re-exports for common use.

pub use crate::config::HybridConfig;
pub use crate::error::{ErrorKind, LanguageModelError, Result};
pub use crate::events::{EventSink, ModelEvent};
pub use crate::model::{LanguageModel, ModelFactory};
pub use crate::provider::{Availability, BackendKind, LanguageModelBackend, LocalModelHost};
pub use crate::stream::TextStream;
pub use crate::types::{
    Capabilities, ConversationInput, CreateOptions, ExpectedInput, Message, ModelOptions,
    PartialMessage, PromptType, Role,
};
