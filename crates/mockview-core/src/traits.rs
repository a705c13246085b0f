//! Collaborator trait definitions: generative models and record stores.
//!
//! The generative-model trait is implemented by `mockview-providers`; the
//! record-store trait by [`crate::store`]. Neither is needed to score a
//! session, only to fetch one and to ask a model about it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::QnAPair;

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for generative-model backends that turn a prompt into text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Complete a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List models this provider knows about.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request for a single completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-1.5-flash").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// A completion returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Record store trait
// ---------------------------------------------------------------------------

/// Trait for storage of question/answer pairs grouped by session.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All pairs recorded for a session, in insertion order.
    ///
    /// Unknown sessions yield an empty list, not an error.
    async fn fetch(&self, session_id: &str) -> anyhow::Result<Vec<QnAPair>>;

    /// Record a pair and return its row id.
    async fn append(&self, session_id: &str, pair: QnAPair) -> anyhow::Result<u64>;

    /// Known session ids, in order of first appearance.
    async fn sessions(&self) -> anyhow::Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Reply cleanup
// ---------------------------------------------------------------------------

/// Strip a surrounding markdown code fence from a model reply.
///
/// Handles a language tag on the opening fence (```` ```json ````) and
/// truncated replies with no closing fence. Unfenced text is returned
/// trimmed.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let inner = trimmed.trim_matches('`');
    match inner.split_once('\n') {
        Some((tag, rest)) if is_language_tag(tag.trim()) => rest.trim(),
        _ => inner.trim(),
    }
}

fn is_language_tag(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
