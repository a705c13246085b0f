//! Offline provider with canned replies.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use mockview_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage};

use crate::error::ProviderError;

/// Replies without touching the network.
///
/// Rules are checked in insertion order; the first whose needle occurs in the
/// prompt wins, otherwise the default reply is returned.
pub struct MockProvider {
    rules: Vec<(String, String)>,
    default_response: String,
    fail: bool,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Always answer with `response`.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            rules: Vec::new(),
            default_response: response.to_string(),
            fail: false,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Every call fails with a 503 API error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_fixed_response("")
        }
    }

    /// Answer `response` when the prompt contains `needle`.
    pub fn when_prompt_contains(mut self, needle: &str, response: &str) -> Self {
        self.rules.push((needle.to_string(), response.to_string()));
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        if self.fail {
            return Err(ProviderError::ApiError {
                status: 503,
                message: "mock provider configured to fail".into(),
            }
            .into());
        }

        let content = self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_response.clone());

        // Rough four-characters-per-token estimate.
        let prompt_tokens = (request.prompt.len() / 4) as u32;
        let completion_tokens = (content.len() / 4) as u32;

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "mock-model".into(),
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("{\"score\": 50}");
        let response = provider.generate(&request("anything")).await.unwrap();
        assert_eq!(response.content, "{\"score\": 50}");
        assert_eq!(response.model, "mock-model");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching_uses_first_rule() {
        let provider = MockProvider::with_fixed_response("default")
            .when_prompt_contains("questions", "[\"Q1?\"]")
            .when_prompt_contains("Q1:", "{\"score\": 10}");

        let questions = provider
            .generate(&request("Generate 1 interview questions"))
            .await
            .unwrap();
        assert_eq!(questions.content, "[\"Q1?\"]");

        let feedback = provider.generate(&request("Q1: hi\nA1: hello")).await.unwrap();
        assert_eq!(feedback.content, "{\"score\": 10}");

        let other = provider.generate(&request("unrelated")).await.unwrap();
        assert_eq!(other.content, "default");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn failing_provider_counts_calls() {
        let provider = MockProvider::failing();
        let err = provider.generate(&request("x")).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert_eq!(provider.call_count(), 1);
    }
}
