//! The `mockview init` command.

use std::path::Path;

use anyhow::{Context, Result};

use mockview_providers::config::LOCAL_CONFIG_FILE;

pub fn execute() -> Result<()> {
    if Path::new(LOCAL_CONFIG_FILE).exists() {
        println!("{LOCAL_CONFIG_FILE} already exists, skipping.");
    } else {
        std::fs::write(LOCAL_CONFIG_FILE, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {LOCAL_CONFIG_FILE}"))?;
        println!("Created {LOCAL_CONFIG_FILE}");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit {LOCAL_CONFIG_FILE})");
    println!("  2. Run: mockview record --session demo --question \"...\" --answer \"...\"");
    println!("  3. Run: mockview feedback --session demo");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mockview configuration

default_provider = "gemini"
default_model = "gemini-1.5-flash"
temperature = 0.0
max_tokens = 2048
parallelism = 4
store_path = "mockview-data/records.json"
use_model_feedback = true

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

# Offline provider with a canned reply, handy for demos.
[providers.offline]
type = "mock"
response = '{"score": 75, "summary": "Canned feedback.", "strengths": [], "improvements": [], "suggestions": []}'
"#;
