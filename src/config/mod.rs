//! Configuration system (layered: code > env > config file).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{LanguageModelError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENV_BASE_URL: &str = "HYBRID_LM_BASE_URL";
pub const ENV_CAPABILITIES_METHOD: &str = "HYBRID_LM_CAPABILITIES_METHOD";
pub const ENV_TIMEOUT_SECS: &str = "HYBRID_LM_TIMEOUT_SECS";
pub const ENV_ORIGIN: &str = "HYBRID_LM_ORIGIN";
pub const ENV_FORCE_FALLBACK: &str = "HYBRID_LM_FORCE_FALLBACK";

/// HTTP method used for the capability query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CapabilitiesMethod {
    #[default]
    Get,
    Post,
}

/// Settings for reaching the remote peer and choosing a backend.
///
/// Resolution order, highest first:
/// 1. `with_*` setters
/// 2. `HYBRID_LM_*` environment variables (a `.env` file is honored)
/// 3. `~/.hybrid-lm/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    pub base_url: String,
    pub capabilities_method: CapabilitiesMethod,
    /// Bounds connecting, each body read, and the whole of a buffered call.
    /// Written as (possibly fractional) seconds in TOML.
    #[serde(rename = "request_timeout_secs", with = "duration_secs")]
    pub request_timeout: Duration,
    pub origin: Option<String>,
    pub force_fallback: bool,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            capabilities_method: CapabilitiesMethod::Get,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            origin: None,
            force_fallback: false,
        }
    }
}

impl HybridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config file (if present) and overlay environment variables.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let base = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        base.apply_env()
    }

    /// Defaults overlaid with environment variables only.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::default().apply_env()
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            LanguageModelError::Configuration(format!("{}: {e}", path.display()))
        })
    }

    /// Overlay `HYBRID_LM_*` variables from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup.
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(method) = lookup(ENV_CAPABILITIES_METHOD) {
            self.capabilities_method = method.trim().parse().map_err(|_| {
                LanguageModelError::Configuration(format!(
                    "{ENV_CAPABILITIES_METHOD} must be GET or POST, got '{method}'"
                ))
            })?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout = secs
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|s| Duration::try_from_secs_f64(s).ok())
                .filter(|d| !d.is_zero())
                .ok_or_else(|| {
                    LanguageModelError::Configuration(format!(
                        "{ENV_TIMEOUT_SECS} must be a positive number of seconds, got '{secs}'"
                    ))
                })?;
        }
        if let Some(origin) = lookup(ENV_ORIGIN) {
            self.origin = Some(origin).filter(|o| !o.trim().is_empty());
        }
        if let Some(flag) = lookup(ENV_FORCE_FALLBACK) {
            self.force_fallback = parse_flag(&flag).ok_or_else(|| {
                LanguageModelError::Configuration(format!(
                    "{ENV_FORCE_FALLBACK} must be a boolean, got '{flag}'"
                ))
            })?;
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_capabilities_method(mut self, method: CapabilitiesMethod) -> Self {
        self.capabilities_method = method;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_force_fallback(mut self, force: bool) -> Self {
        self.force_fallback = force;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// `~/.hybrid-lm/config.toml`, if a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().join(".hybrid-lm").join("config.toml"))
}

mod duration_secs {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_peer() {
        let config = HybridConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.capabilities_method, CapabilitiesMethod::Get);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert!(!config.force_fallback);
    }

    #[test]
    fn env_vars_override_fields() {
        let config = HybridConfig::default()
            .apply_vars(vars(&[
                (ENV_BASE_URL, "http://peer:9000"),
                (ENV_CAPABILITIES_METHOD, "post"),
                (ENV_TIMEOUT_SECS, "5"),
                (ENV_ORIGIN, "http://app.test"),
                (ENV_FORCE_FALLBACK, "yes"),
            ]))
            .unwrap();
        assert_eq!(config.base_url, "http://peer:9000");
        assert_eq!(config.capabilities_method, CapabilitiesMethod::Post);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.origin.as_deref(), Some("http://app.test"));
        assert!(config.force_fallback);
    }

    #[test]
    fn invalid_env_values_are_configuration_errors() {
        for (key, value) in [
            (ENV_CAPABILITIES_METHOD, "PUT"),
            (ENV_TIMEOUT_SECS, "soon"),
            (ENV_FORCE_FALLBACK, "maybe"),
        ] {
            let err = HybridConfig::default()
                .apply_vars(vars(&[(key, value)]))
                .unwrap_err();
            assert!(matches!(err, LanguageModelError::Configuration(_)), "{key}");
        }
    }

    #[test]
    fn sub_second_timeout_is_kept() {
        let config = HybridConfig::default().with_request_timeout(Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_millis(500));

        let config = HybridConfig::default()
            .apply_vars(vars(&[(ENV_TIMEOUT_SECS, "1.5")]))
            .unwrap();
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn zero_or_negative_env_timeout_is_rejected() {
        for value in ["0", "-1", "NaN"] {
            let err = HybridConfig::default()
                .apply_vars(vars(&[(ENV_TIMEOUT_SECS, value)]))
                .unwrap_err();
            assert!(matches!(err, LanguageModelError::Configuration(_)), "{value}");
        }
    }

    #[test]
    fn setters_win_over_env() {
        let config = HybridConfig::default()
            .apply_vars(vars(&[(ENV_BASE_URL, "http://env:1")]))
            .unwrap()
            .with_base_url("http://code:2");
        assert_eq!(config.base_url, "http://code:2");
    }
}
