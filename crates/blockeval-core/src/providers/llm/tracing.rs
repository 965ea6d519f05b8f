use crate::model::LlmResponse;
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Wraps a client in a `gen_ai.client.request` span per call.
pub struct TracingLlmClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmClient for TracingLlmClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let span = info_span!(
            "gen_ai.client.request",
            "gen_ai.system" = self.inner.provider_name(),
            "gen_ai.request.model" = self.inner.model_name(),
            "gen_ai.usage.input_tokens" = tracing::field::Empty,
            "gen_ai.usage.output_tokens" = tracing::field::Empty,
            "latency_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.complete(prompt).await;
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let span = tracing::Span::current();
            span.record("latency_ms", elapsed_ms);

            match &result {
                Ok(resp) => {
                    if let Some(usage) = resp.meta.get("usage") {
                        if let Some(i) = usage.get("input_tokens").and_then(|v| v.as_u64()) {
                            span.record("gen_ai.usage.input_tokens", i);
                        }
                        if let Some(o) = usage.get("output_tokens").and_then(|v| v.as_u64()) {
                            span.record("gen_ai.usage.output_tokens", o);
                        }
                    }
                    tracing::debug!(chars = resp.text.len(), "model replied");
                }
                Err(e) => {
                    span.record("error", true);
                    span.record("error.message", e.to_string().as_str());
                    tracing::warn!(error = %e, "model request failed");
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::fake::FakeClient;

    #[tokio::test]
    async fn passes_responses_through() {
        let inner = Arc::new(FakeClient::new("gemini-test").with_response("{\"results\": []}"));
        let client = TracingLlmClient::new(inner);

        let resp = client.complete("prompt").await.unwrap();
        assert_eq!(resp.text, "{\"results\": []}");
        assert_eq!(client.model_name(), "gemini-test");
        assert_eq!(client.provider_name(), "fake");
    }

    #[tokio::test]
    async fn passes_errors_through() {
        let inner = Arc::new(FakeClient::new("gemini-test").with_error("quota exceeded"));
        let client = TracingLlmClient::new(inner);

        let err = client.complete("prompt").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
