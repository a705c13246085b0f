//! The `mockview sessions` command.

use std::path::PathBuf;

use anyhow::Result;

use mockview_core::store::JsonFileStore;
use mockview_core::traits::RecordStore;
use mockview_providers::config::load_config_from;

pub async fn execute(store_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let store_path = match store_path {
        Some(p) => p,
        None => load_config_from(config_path.as_deref())?.store_path,
    };

    let sessions = JsonFileStore::new(&store_path).sessions().await?;
    if sessions.is_empty() {
        println!("No sessions recorded in {}", store_path.display());
    }
    for session in sessions {
        println!("{session}");
    }
    Ok(())
}
