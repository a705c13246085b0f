//! The `mockview record` command.

use std::path::PathBuf;

use anyhow::Result;

use mockview_core::model::QnAPair;
use mockview_core::store::JsonFileStore;
use mockview_core::traits::RecordStore;
use mockview_providers::config::load_config_from;

pub async fn execute(
    session: String,
    question: String,
    answer: String,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let session = session.trim();
    anyhow::ensure!(!session.is_empty(), "session id must not be empty");
    anyhow::ensure!(!question.trim().is_empty(), "question must not be empty");

    let store_path = match store_path {
        Some(p) => p,
        None => load_config_from(config_path.as_deref())?.store_path,
    };

    let store = JsonFileStore::new(&store_path);
    let id = store.append(session, QnAPair::new(question, answer)).await?;

    println!(
        "Recorded row {id} for session {session} in {}",
        store_path.display()
    );
    Ok(())
}
