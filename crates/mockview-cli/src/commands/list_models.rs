//! The `mockview list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use mockview_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = mockview_providers::config::load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    if let Some(filter) = &provider_filter {
        anyhow::ensure!(
            config.providers.contains_key(filter),
            "provider '{filter}' is not configured"
        );
    }

    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|f| f != name) {
            continue;
        }

        let provider_config = &config.providers[name];
        let provider = create_provider(provider_config)?;
        let models = provider.available_models();
        if models.is_empty() {
            continue;
        }

        found_any = true;
        let default_marker = if *name == config.default_provider {
            " (default)"
        } else {
            ""
        };
        let key_marker = if provider_config.is_usable() {
            ""
        } else {
            " [no API key]"
        };
        println!("Provider: {name}{default_marker}{key_marker}");
        for model in &models {
            println!(
                "  {}: {} ({}K context)",
                model.id,
                model.name,
                model.max_context / 1000,
            );
        }
        println!();
    }

    if !found_any {
        println!("No providers configured. Run `mockview init` to create a config file.");
    }

    Ok(())
}
