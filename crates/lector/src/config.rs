//! Backend invocation configuration.
//!
//! A [`BackendProfile`] is everything the adapter factory needs to build a
//! working backend: which wire protocol to speak, where to reach it, which
//! model to request, and the sampling/latency knobs forwarded with every
//! call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default sampling temperature for review calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Default reply budget in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default per-call timeout in seconds, enforced by the adapter's HTTP client.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    MissingVar(&'static str),

    #[error("Environment variable '{key}' has an invalid value: '{value}'")]
    InvalidVar { key: &'static str, value: String },

    #[error("Unknown interface format '{0}' (expected openai, deepseek, lm studio, ollama, anthropic, or claude)")]
    UnknownInterfaceFormat(String),
}

/// Which wire protocol the backend speaks.
///
/// The set is closed: backend dispatch is a `match` over these variants, so a
/// format without an adapter cannot reach a call site. Providers that only
/// differ in hostname (DeepSeek, LM Studio, vLLM, ...) all ride on
/// [`InterfaceFormat::OpenAi`] with their own `base_url`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceFormat {
    /// OpenAI-style `/chat/completions`.
    #[default]
    OpenAi,
    /// Native Ollama `/api/generate`.
    Ollama,
    /// Anthropic Messages API.
    Anthropic,
}

impl InterfaceFormat {
    /// Canonical lowercase tag, as accepted by [`FromStr`] and serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Anthropic => "anthropic",
        }
    }

    /// Default service root for this format, used when no base URL is
    /// configured.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }
}

impl fmt::Display for InterfaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "lm studio" | "lmstudio" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(ConfigError::UnknownInterfaceFormat(other.to_string())),
        }
    }
}

/// Deserialization goes through [`FromStr`], so a JSON profile accepts the
/// same tags as `LECTOR_INTERFACE_FORMAT`, provider-facing names included.
impl<'de> Deserialize<'de> for InterfaceFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parameters for one review backend, passed through to the factory as given.
/// Ranges are not validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendProfile {
    pub interface_format: InterfaceFormat,
    /// Service root, e.g. `https://api.openai.com/v1` or
    /// `http://localhost:11434`. Trailing slashes are tolerated.
    pub base_url: String,
    pub model_name: String,
    /// May be empty for servers that do not authenticate (Ollama, LM Studio).
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for BackendProfile {
    fn default() -> Self {
        let interface_format = InterfaceFormat::default();
        Self {
            interface_format,
            base_url: interface_format.default_base_url().to_string(),
            model_name: String::new(),
            api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendProfile {
    /// Loads a profile from `LECTOR_*` environment variables (and `.env` if
    /// present). Only `LECTOR_MODEL` is required; everything else falls back
    /// to defaults, with the base URL chosen per interface format.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let interface_format = match std::env::var("LECTOR_INTERFACE_FORMAT") {
            Ok(raw) => raw.parse::<InterfaceFormat>()?,
            Err(_) => InterfaceFormat::default(),
        };

        Ok(Self {
            interface_format,
            base_url: std::env::var("LECTOR_BASE_URL")
                .unwrap_or_else(|_| interface_format.default_base_url().to_string()),
            model_name: require_env("LECTOR_MODEL")?,
            api_key: std::env::var("LECTOR_API_KEY").unwrap_or_default(),
            temperature: parse_env("LECTOR_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_env("LECTOR_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            timeout_secs: parse_env("LECTOR_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }
}

fn require_env(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidVar { key, value: raw }),
        Err(_) => Ok(default),
    }
}
