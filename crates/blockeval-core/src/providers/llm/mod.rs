pub mod fake;
pub mod gemini;
pub mod tracing;

use crate::model::LlmResponse;
use async_trait::async_trait;

/// A generative model that answers a single prompt.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;

    /// Model identifier reported in the summary.
    fn model_name(&self) -> &str;
}
