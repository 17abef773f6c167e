//! Creation options for a language model facade.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::capabilities::Capabilities;
use super::message::{Message, PartialMessage, PromptType};
use crate::error::{LanguageModelError, Result};

/// A kind of input the caller expects to send, with optional language hints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectedInput {
    #[serde(rename = "type")]
    pub kind: PromptType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
}

impl ExpectedInput {
    pub fn text(languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: PromptType::Text,
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options as supplied by the caller.
///
/// `temperature` and `top_k` left as `None` are filled from the backend's
/// capabilities when the facade is created. `Some(0.0)` is a real value.
///
/// ```
/// use hybrid_lm::types::ModelOptions;
///
/// let options = ModelOptions::builder()
///     .temperature(0.0)
///     .system_prompt("Answer in one sentence.")
///     .build();
/// assert_eq!(options.temperature, Some(0.0));
/// assert_eq!(options.top_k, None);
/// ```
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    #[builder(into)]
    pub system_prompt: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub expected_inputs: Vec<ExpectedInput>,
    #[builder(default)]
    #[serde(default)]
    pub initial_prompts: Vec<PartialMessage>,
}

/// Fully resolved options carried, unchanged, by every request of a facade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptions {
    pub temperature: f32,
    pub top_k: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub expected_inputs: Vec<ExpectedInput>,
    #[serde(default)]
    pub initial_prompts: Vec<Message>,
}

impl CreateOptions {
    /// Check sampling parameters against the backend limits and the system
    /// prompt rules.
    pub fn validate(&self, capabilities: &Capabilities) -> Result<()> {
        if !self.temperature.is_finite()
            || self.temperature < 0.0
            || self.temperature > capabilities.max_temperature
        {
            return Err(LanguageModelError::InvalidArgument(format!(
                "temperature {} is outside [0, {}]",
                self.temperature, capabilities.max_temperature
            )));
        }
        if self.top_k == 0 || self.top_k > capabilities.max_top_k {
            return Err(LanguageModelError::InvalidArgument(format!(
                "topK {} is outside [1, {}]",
                self.top_k, capabilities.max_top_k
            )));
        }
        self.system_prompt_text()?;
        Ok(())
    }

    /// The effective system prompt, from `system_prompt` or a single
    /// `system`-role initial prompt. Both at once is an error.
    pub fn system_prompt_text(&self) -> Result<Option<&str>> {
        let mut initial_system = self.initial_prompts.iter().filter(|p| p.is_system());

        if let Some(ref prompt) = self.system_prompt {
            if initial_system.next().is_some() {
                return Err(LanguageModelError::InvalidArgument(
                    "system prompt is already set".into(),
                ));
            }
            return Ok(Some(prompt.as_str()));
        }

        let Some(first) = initial_system.next() else {
            return Ok(None);
        };
        if initial_system.next().is_some() {
            return Err(LanguageModelError::InvalidArgument(
                "only one system prompt is allowed".into(),
            ));
        }
        if first.kind != PromptType::Text {
            return Err(LanguageModelError::InvalidArgument(
                "system prompt is not a text prompt".into(),
            ));
        }
        Ok(Some(first.content.as_str()))
    }
}
