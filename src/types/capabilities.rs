//! Sampling limits and defaults declared by a backend.

use serde::{Deserialize, Serialize};

use crate::error::{LanguageModelError, Result};

/// Limits and defaults a backend declares for its sampling parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub max_temperature: f32,
    pub max_top_k: u32,
    pub default_temperature: f32,
    pub default_top_k: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Capabilities {
    pub const fn new(
        max_temperature: f32,
        max_top_k: u32,
        default_temperature: f32,
        default_top_k: u32,
    ) -> Self {
        Self {
            max_temperature,
            max_top_k,
            default_temperature,
            default_top_k,
            default_top_p: None,
            max_tokens: None,
        }
    }

    /// Defaults must not exceed their maxima.
    pub fn validate(&self) -> Result<()> {
        if self.max_temperature.is_nan()
            || self.default_temperature.is_nan()
            || self.default_temperature > self.max_temperature
        {
            return Err(LanguageModelError::InvalidArgument(format!(
                "defaultTemperature {} exceeds maxTemperature {}",
                self.default_temperature, self.max_temperature
            )));
        }
        if self.default_top_k > self.max_top_k {
            return Err(LanguageModelError::InvalidArgument(format!(
                "defaultTopK {} exceeds maxTopK {}",
                self.default_top_k, self.max_top_k
            )));
        }
        Ok(())
    }
}
