//! Model and generation configuration, plus credential lookup.

use serde::{Deserialize, Serialize};

use crate::errors::{EvalError, EvalResult};

/// Output token budget granted per sentence in a block.
pub const TOKENS_PER_SENTENCE: u32 = 512;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];

/// Sampling settings sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl GenerationConfig {
    /// Greedy decoding with a JSON reply and a budget scaled to the block.
    pub fn deterministic(block_size: usize) -> Self {
        let sentences = u32::try_from(block_size).unwrap_or(u32::MAX);
        Self {
            temperature: 0.0,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: sentences.saturating_mul(TOKENS_PER_SENTENCE),
            response_mime_type: "application/json".to_string(),
        }
    }
}

/// Model endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g. "gemini-2.5-flash").
    #[serde(default = "default_model")]
    pub model: String,

    /// API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ModelConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `BLOCKEVAL_GEMINI_URL` | API base URL |
    /// | `BLOCKEVAL_TIMEOUT` | Request timeout in seconds |
    ///
    /// The API key is not read here; see [`resolve_api_key`].
    pub fn from_env() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: std::env::var("BLOCKEVAL_GEMINI_URL")
                .unwrap_or_else(|_| default_base_url()),
            timeout_secs: std::env::var("BLOCKEVAL_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Resolve the API key from the command line, then the process environment.
pub fn resolve_api_key(cli_key: Option<&str>) -> EvalResult<String> {
    resolve_api_key_with(cli_key, |name| std::env::var(name).ok())
}

/// Resolve the API key using `lookup` for environment access.
///
/// The first non-empty candidate wins and is trimmed; a candidate made only
/// of whitespace therefore still fails.
pub fn resolve_api_key_with<F>(cli_key: Option<&str>, lookup: F) -> EvalResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let candidate = cli_key
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| {
            API_KEY_ENV_VARS
                .into_iter()
                .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
        })
        .unwrap_or_default();

    let key = candidate.trim();
    if key.is_empty() {
        return Err(EvalError::MissingCredential);
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn cli_key_takes_precedence() {
        let key = resolve_api_key_with(Some(" cli-key "), env(&[("GEMINI_API_KEY", "env")]));
        assert_eq!(key.unwrap(), "cli-key");
    }

    #[test]
    fn falls_back_through_env_vars_in_order() {
        let key = resolve_api_key_with(None, env(&[("VITE_GEMINI_API_KEY", "vite")]));
        assert_eq!(key.unwrap(), "vite");

        let key = resolve_api_key_with(
            Some(""),
            env(&[("GEMINI_API_KEY", "primary"), ("VITE_GEMINI_API_KEY", "vite")]),
        );
        assert_eq!(key.unwrap(), "primary");
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        assert!(matches!(
            resolve_api_key_with(None, env(&[])),
            Err(EvalError::MissingCredential)
        ));
        assert!(matches!(
            resolve_api_key_with(None, env(&[("GEMINI_API_KEY", "   ")])),
            Err(EvalError::MissingCredential)
        ));
    }

    #[test]
    fn generation_budget_scales_with_block_size() {
        let cfg = GenerationConfig::deterministic(4);
        assert_eq!(cfg.max_output_tokens, 2048);
        assert_eq!(cfg.top_k, 1);
        assert_eq!(cfg.temperature, 0.0);

        let wire = serde_json::to_value(&cfg).unwrap();
        assert_eq!(wire["responseMimeType"], "application/json");
        assert_eq!(wire["maxOutputTokens"], 2048);
        assert_eq!(wire["topP"], 1.0);
    }

    #[test]
    fn model_config_builders() {
        let cfg = ModelConfig::default()
            .with_model("gemini-1.5-flash")
            .with_base_url("http://localhost:9")
            .with_timeout_secs(5);
        assert_eq!(cfg.model, "gemini-1.5-flash");
        assert_eq!(cfg.base_url, "http://localhost:9");
        assert_eq!(cfg.timeout_secs, 5);
        assert!(cfg.api_key.is_none());
    }
}
