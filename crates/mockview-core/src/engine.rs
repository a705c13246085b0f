//! Feedback engine.
//!
//! Fetches a session from the record store and produces feedback for it,
//! asking the generative model when one is configured and degrading to the
//! heuristic scorer when it is not or when it fails.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::error::ProviderError;
use crate::model::{FeedbackSource, QnAPair, SessionFeedback};
use crate::prompt::{feedback_prompt, COACH_SYSTEM_PROMPT};
use crate::scoring::score_session;
use crate::traits::{strip_code_fences, GenerateRequest, LlmProvider, RecordStore};

/// Configuration for the feedback engine.
#[derive(Debug, Clone)]
pub struct FeedbackEngineConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Maximum sessions evaluated concurrently.
    pub parallelism: usize,
}

impl Default for FeedbackEngineConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.0,
            max_tokens: 2048,
            parallelism: 4,
        }
    }
}

/// The central feedback engine.
pub struct FeedbackEngine {
    store: Arc<dyn RecordStore>,
    provider: Option<Arc<dyn LlmProvider>>,
    config: FeedbackEngineConfig,
}

impl FeedbackEngine {
    /// Engine that scores heuristically until a provider is attached.
    pub fn new(store: Arc<dyn RecordStore>, config: FeedbackEngineConfig) -> Self {
        Self {
            store,
            provider: None,
            config,
        }
    }

    /// Attach a generative-model provider.
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Produce feedback for one session.
    ///
    /// Only a record-store failure is an error; every model problem degrades
    /// to heuristic or fallback feedback.
    pub async fn feedback_for_session(&self, session_id: &str) -> Result<SessionFeedback> {
        let pairs = self.store.fetch(session_id).await?;
        if pairs.is_empty() {
            tracing::info!(session_id, "no Q&A recorded for session");
            return Ok(SessionFeedback::no_data(session_id));
        }

        let Some(provider) = &self.provider else {
            return Ok(score_session(session_id, &pairs));
        };

        Ok(self.model_feedback(provider.as_ref(), session_id, &pairs).await)
    }

    /// Produce feedback for several sessions concurrently.
    ///
    /// Results come back in the order of `session_ids`.
    pub async fn feedback_for_sessions(
        &self,
        session_ids: &[String],
    ) -> Vec<(String, Result<SessionFeedback>)> {
        let semaphore = Semaphore::new(self.config.parallelism.max(1));
        let mut futures = FuturesUnordered::new();

        for (position, session_id) in session_ids.iter().enumerate() {
            let semaphore = &semaphore;
            futures.push(async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => self.feedback_for_session(session_id).await,
                    Err(_) => Err(anyhow::anyhow!("semaphore closed")),
                };
                (position, session_id.clone(), result)
            });
        }

        let mut results = Vec::with_capacity(session_ids.len());
        while let Some((position, session_id, result)) = futures.next().await {
            if let Err(e) = &result {
                tracing::error!("feedback failed for {session_id}: {e:#}");
            }
            results.push((position, session_id, result));
        }

        results.sort_by_key(|(position, _, _)| *position);
        results
            .into_iter()
            .map(|(_, session_id, result)| (session_id, result))
            .collect()
    }

    async fn model_feedback(
        &self,
        provider: &dyn LlmProvider,
        session_id: &str,
        pairs: &[QnAPair],
    ) -> SessionFeedback {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: feedback_prompt(pairs),
            system_prompt: Some(COACH_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let start = Instant::now();
        match provider.generate(&request).await {
            Ok(response) => {
                tracing::debug!(
                    session_id,
                    provider = provider.name(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "model feedback received"
                );
                parse_model_feedback(session_id, &response.content)
            }
            Err(e) => {
                let permanent = e
                    .downcast_ref::<ProviderError>()
                    .is_some_and(ProviderError::is_permanent);
                tracing::warn!(
                    session_id,
                    provider = provider.name(),
                    permanent,
                    "model feedback failed, using heuristic scoring: {e:#}"
                );
                score_session(session_id, pairs)
            }
        }
    }
}

/// The JSON object a model is asked to return.
#[derive(Debug, Deserialize)]
struct ModelFeedback {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Turn a model reply into session feedback.
///
/// Fenced replies are unwrapped and cut to the first `{`. A reply that still
/// isn't a feedback object becomes fallback feedback carrying the raw text.
pub fn parse_model_feedback(session_id: &str, reply: &str) -> SessionFeedback {
    let fenced = reply.trim_start().starts_with("```");
    let mut payload = strip_code_fences(reply);
    if fenced {
        if let Some(brace) = payload.find('{') {
            payload = &payload[brace..];
        }
    }

    match serde_json::from_str::<ModelFeedback>(payload) {
        Ok(parsed) => SessionFeedback {
            session_id: session_id.to_string(),
            score: parsed
                .score
                .filter(|s| s.is_finite())
                .map(|s| s.round_ties_even().clamp(0.0, 100.0) as u32),
            summary: parsed.summary,
            strengths: parsed.strengths,
            improvements: parsed.improvements,
            suggestions: parsed.suggestions,
            metrics: None,
            per_question: Vec::new(),
            source: FeedbackSource::Model,
        },
        Err(e) => {
            tracing::warn!(session_id, "model reply is not valid feedback JSON: {e}");
            SessionFeedback::model_fallback(session_id, reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::traits::{GenerateResponse, ModelInfo, TokenUsage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedProvider {
        reply: Option<String>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match &self.reply {
                Some(content) => Ok(GenerateResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    token_usage: TokenUsage::default(),
                    latency_ms: 1,
                }),
                None => Err(crate::error::ProviderError::Timeout(30).into()),
            }
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_session(
            "s1",
            [
                QnAPair::new("Explain ownership in Rust", "Each value has one owner."),
                QnAPair::new("What is a trait?", ""),
            ],
        ))
    }

    #[tokio::test]
    async fn heuristic_without_provider() {
        let engine = FeedbackEngine::new(store(), FeedbackEngineConfig::default());
        let fb = engine.feedback_for_session("s1").await.unwrap();
        assert_eq!(fb.source, FeedbackSource::Heuristic);
        assert!(fb.score.is_some());
        assert_eq!(fb.per_question.len(), 2);
        assert_eq!(fb.metrics.unwrap().completeness, 0.5);
    }

    #[tokio::test]
    async fn unknown_session_is_no_data_and_skips_model() {
        let provider = Arc::new(ScriptedProvider::replying("{}"));
        let engine = FeedbackEngine::new(store(), FeedbackEngineConfig::default())
            .with_provider(provider.clone());
        let fb = engine.feedback_for_session("missing").await.unwrap();
        assert_eq!(fb.score, None);
        assert_eq!(fb.source, FeedbackSource::NoData);
        assert_eq!(provider.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn model_reply_is_used() {
        let reply = r#"```json
{"score": 72, "summary": "Solid", "strengths": ["Clear"], "improvements": ["Depth"], "suggestions": ["Practice"]}
```"#;
        let engine = FeedbackEngine::new(store(), FeedbackEngineConfig::default())
            .with_provider(Arc::new(ScriptedProvider::replying(reply)));
        let fb = engine.feedback_for_session("s1").await.unwrap();
        assert_eq!(fb.source, FeedbackSource::Model);
        assert_eq!(fb.score, Some(72));
        assert_eq!(fb.summary, "Solid");
        assert_eq!(fb.strengths, vec!["Clear"]);
        assert!(fb.per_question.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_heuristic() {
        let engine = FeedbackEngine::new(store(), FeedbackEngineConfig::default())
            .with_provider(Arc::new(ScriptedProvider::failing()));
        let fb = engine.feedback_for_session("s1").await.unwrap();
        assert_eq!(fb.source, FeedbackSource::Heuristic);
        assert!(fb.score.is_some());
    }

    #[tokio::test]
    async fn malformed_reply_becomes_fallback() {
        let engine = FeedbackEngine::new(store(), FeedbackEngineConfig::default())
            .with_provider(Arc::new(ScriptedProvider::replying("Great job overall!")));
        let fb = engine.feedback_for_session("s1").await.unwrap();
        assert_eq!(fb.source, FeedbackSource::ModelFallback);
        assert_eq!(fb.summary, "Great job overall!");
        assert_eq!(fb.score, None);
        assert!(fb.strengths.is_empty());
        assert!(fb.suggestions.is_empty());
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store
                .append(id, QnAPair::new("Explain caching", format!("answer for {id}")))
                .await
                .unwrap();
        }
        let engine = FeedbackEngine::new(
            Arc::new(store),
            FeedbackEngineConfig {
                parallelism: 2,
                ..Default::default()
            },
        );
        let ids: Vec<String> = ["c", "missing", "a", "b"].iter().map(|s| s.to_string()).collect();
        let results = engine.feedback_for_sessions(&ids).await;
        let order: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["c", "missing", "a", "b"]);
        assert_eq!(results[1].1.as_ref().unwrap().score, None);
        assert!(results[0].1.as_ref().unwrap().score.is_some());
    }

    #[test]
    fn parse_clamps_and_rounds_score() {
        assert_eq!(parse_model_feedback("s", r#"{"score": 140}"#).score, Some(100));
        assert_eq!(parse_model_feedback("s", r#"{"score": -3}"#).score, Some(0));
        assert_eq!(parse_model_feedback("s", r#"{"score": 71.6}"#).score, Some(72));
        assert_eq!(parse_model_feedback("s", r#"{"summary": "ok"}"#).score, None);
    }

    #[test]
    fn parse_fenced_with_preamble() {
        let reply = "```\nHere you go:\n{\"score\": 50, \"summary\": \"fine\"}\n```";
        let fb = parse_model_feedback("s", reply);
        assert_eq!(fb.source, FeedbackSource::Model);
        assert_eq!(fb.score, Some(50));
    }

    #[test]
    fn parse_blank_reply() {
        let fb = parse_model_feedback("s", "");
        assert_eq!(fb.source, FeedbackSource::ModelFallback);
        assert!(fb.summary.contains("failed to produce valid JSON"));
    }

    #[test]
    fn parse_wrong_shape_is_fallback() {
        let fb = parse_model_feedback("s", r#"{"score": "high"}"#);
        assert_eq!(fb.source, FeedbackSource::ModelFallback);
        assert_eq!(fb.summary, r#"{"score": "high"}"#);
    }
}
