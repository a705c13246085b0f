//! The `mockview questions` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use mockview_core::questions::{QuestionGenerator, QuestionRequest};
use mockview_providers::config::load_config_from;

pub async fn execute(
    role: String,
    skills: Option<String>,
    experience_years: u32,
    count: usize,
    provider_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let Some(provider) = config.provider(provider_name.as_deref())? else {
        anyhow::bail!(
            "no model provider available: set GEMINI_API_KEY or configure [providers.{}] in mockview.toml",
            config.default_provider
        );
    };

    let skills: Vec<String> = skills
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let generator = QuestionGenerator::new(Arc::from(provider), config.default_model.clone())
        .with_max_tokens(config.max_tokens);
    let questions = generator
        .generate(&QuestionRequest {
            role,
            skills,
            experience_years,
            count,
        })
        .await?;

    for (i, question) in questions.iter().enumerate() {
        println!("{}. {question}", i + 1);
    }
    Ok(())
}
