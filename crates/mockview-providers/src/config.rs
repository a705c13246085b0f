//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mockview_core::engine::FeedbackEngineConfig;
use mockview_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;

/// File name searched in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mockview.toml";

/// Configuration for a single generative-model provider.
///
/// API keys are masked in the `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Mock {
        #[serde(default = "default_mock_response")]
        response: String,
        #[serde(default)]
        fail: bool,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Mock { response, fail } => f
                .debug_struct("Mock")
                .field("response", response)
                .field("fail", fail)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// A keyed provider with a blank key cannot be called.
    pub fn is_usable(&self) -> bool {
        match self {
            ProviderConfig::Gemini { api_key, .. } | ProviderConfig::OpenAI { api_key, .. } => {
                !api_key.trim().is_empty()
            }
            ProviderConfig::Mock { .. } => true,
        }
    }
}

fn default_mock_response() -> String {
    "{}".to_string()
}

/// Top-level mockview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockviewConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for feedback requests.
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Max sessions evaluated at once.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// JSON file holding recorded Q&A rows.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// When false, feedback is always heuristic.
    #[serde(default = "default_true")]
    pub use_model_feedback: bool,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_parallelism() -> usize {
    4
}
fn default_store_path() -> PathBuf {
    PathBuf::from("mockview-data/records.json")
}
fn default_true() -> bool {
    true
}

impl Default for MockviewConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            parallelism: default_parallelism(),
            store_path: default_store_path(),
            use_model_feedback: true,
        }
    }
}

impl MockviewConfig {
    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> FeedbackEngineConfig {
        FeedbackEngineConfig {
            model: self.default_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            parallelism: self.parallelism.max(1),
        }
    }

    /// Build the named provider, or the default one when `name` is `None`.
    ///
    /// An explicitly named provider must exist and be usable. A missing or
    /// keyless default provider yields `Ok(None)`.
    pub fn provider(&self, name: Option<&str>) -> Result<Option<Box<dyn LlmProvider>>> {
        match name {
            Some(name) => {
                let config = self
                    .providers
                    .get(name)
                    .with_context(|| format!("provider '{name}' is not configured"))?;
                anyhow::ensure!(config.is_usable(), "provider '{name}' has no API key");
                create_provider(config).map(Some)
            }
            None => match self.providers.get(&self.default_provider) {
                Some(config) if config.is_usable() => create_provider(config).map(Some),
                Some(_) => {
                    tracing::debug!(
                        provider = %self.default_provider,
                        "default provider has no API key"
                    );
                    Ok(None)
                }
                None => Ok(None),
            },
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + len]).unwrap_or_default();
        result.replace_range(start..start + len + 1, &value);
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            org_id: org_id.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Mock { .. } => config.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mockview.toml` in the current directory
/// 2. `~/.config/mockview/config.toml`
///
/// Environment overrides: `GEMINI_API_KEY`, `OPENAI_API_KEY`, `MOCKVIEW_STORE_PATH`.
pub fn load_config() -> Result<MockviewConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MockviewConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => [Some(PathBuf::from(LOCAL_CONFIG_FILE)), global_config_path()]
            .into_iter()
            .flatten()
            .find(|p| p.exists()),
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<MockviewConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MockviewConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

/// Apply `GEMINI_API_KEY`, `OPENAI_API_KEY` and `MOCKVIEW_STORE_PATH`.
fn apply_env_overrides(config: &mut MockviewConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(key) = env("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Some(key) = env("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Some(path) = env("MOCKVIEW_STORE_PATH").filter(|p| !p.is_empty()) {
        config.store_path = PathBuf::from(path);
    }
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("mockview")
            .join("config.toml")
    })
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    Ok(match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            Box::new(GeminiProvider::new(api_key, base_url.clone()))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )),
        ProviderConfig::Mock { response, fail } => {
            if *fail {
                Box::new(MockProvider::failing())
            } else {
                Box::new(MockProvider::with_fixed_response(response))
            }
        }
    })
}
