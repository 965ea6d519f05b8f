use super::LlmClient;
use crate::config::{GenerationConfig, ModelConfig};
use crate::errors::{EvalError, EvalResult};
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const USER_AGENT_VALUE: &str = concat!("blockeval/", env!("CARGO_PKG_VERSION"));

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    generation: GenerationConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build a client whose token budget is sized for `block_size` sentences.
    pub fn new(config: ModelConfig, block_size: usize) -> EvalResult<Self> {
        let api_key = config.api_key.ok_or(EvalError::MissingCredential)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| EvalError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            model: config.model,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            generation: GenerationConfig::deterministic(block_size),
            client,
        })
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(body: &Value) -> Option<String> {
    let parts = body.pointer("/candidates/0/content/parts")?.as_array()?;
    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        return None;
    }
    Some(texts.concat())
}

fn usage_meta(body: &Value) -> Value {
    let usage = body.get("usageMetadata");
    let count = |key: &str| usage.and_then(|u| u.get(key)).and_then(Value::as_u64);
    json!({
        "usage": {
            "input_tokens": count("promptTokenCount"),
            "output_tokens": count("candidatesTokenCount"),
        },
        "finish_reason": body.pointer("/candidates/0/finishReason"),
    })
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let url = self.endpoint();
        let body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": self.generation,
        });

        debug!(url = %url, prompt_chars = prompt.len(), "sending generateContent request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini API error (status {}): {}",
                status.as_u16(),
                error_text
            );
        }

        let json: Value = resp.json().await?;

        let text = match candidate_text(&json) {
            Some(text) => text,
            None => {
                let reason = json
                    .pointer("/promptFeedback/blockReason")
                    .and_then(Value::as_str)
                    .unwrap_or("no candidates");
                anyhow::bail!("Gemini API response missing text ({})", reason);
            }
        };

        Ok(LlmResponse {
            text,
            provider: "gemini".to_string(),
            model: self.model.clone(),
            meta: usage_meta(&json),
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
