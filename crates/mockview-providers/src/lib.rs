//! mockview-providers: Generative-model provider integrations.
//!
//! Implements the `LlmProvider` trait for Google Gemini and OpenAI-compatible
//! chat APIs, plus a scripted mock, and loads provider configuration.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config, MockviewConfig, ProviderConfig};
pub use error::ProviderError;
