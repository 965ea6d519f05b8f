use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted client for tests and dry runs: replays queued replies in order
/// and remembers every prompt it was sent.
pub struct FakeClient {
    model: String,
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Ok(text.into()));
        }
        self
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Err(message.into()));
        }
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        self.prompts
            .lock()
            .map_err(|_| anyhow::anyhow!("fake client state poisoned"))?
            .push(prompt.to_string());

        let next = self
            .replies
            .lock()
            .map_err(|_| anyhow::anyhow!("fake client state poisoned"))?
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(LlmResponse {
                text,
                provider: "fake".to_string(),
                model: self.model.clone(),
                meta: serde_json::Value::Null,
            }),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no more fake responses"),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
