//! Record stores for interview sessions.
//!
//! `MemoryStore` keeps rows in process; `JsonFileStore` persists them as a
//! pretty-printed JSON array of rows with auto-incrementing ids.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::QnAPair;
use crate::traits::RecordStore;

/// A stored question/answer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: u64,
    pub session_id: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl StoredRecord {
    fn to_pair(&self) -> QnAPair {
        QnAPair {
            question: self.question.clone().unwrap_or_default(),
            answer: self.answer.clone().unwrap_or_default(),
        }
    }
}

fn session_rows(rows: &[StoredRecord], session_id: &str) -> Vec<QnAPair> {
    let mut matching: Vec<&StoredRecord> =
        rows.iter().filter(|r| r.session_id == session_id).collect();
    matching.sort_by_key(|r| r.id);
    matching.into_iter().map(StoredRecord::to_pair).collect()
}

fn session_ids(rows: &[StoredRecord]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for row in rows {
        if !ids.contains(&row.session_id) {
            ids.push(row.session_id.clone());
        }
    }
    ids
}

fn next_id(rows: &[StoredRecord]) -> u64 {
    rows.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-process store, mainly for tests and one-shot scoring.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding one session.
    pub fn with_session(session_id: &str, pairs: impl IntoIterator<Item = QnAPair>) -> Self {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(i, pair)| StoredRecord {
                id: i as u64 + 1,
                session_id: session_id.to_string(),
                question: Some(pair.question),
                answer: Some(pair.answer),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<StoredRecord>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self, session_id: &str) -> Result<Vec<QnAPair>> {
        Ok(session_rows(&self.rows(), session_id))
    }

    async fn append(&self, session_id: &str, pair: QnAPair) -> Result<u64> {
        let mut rows = self.rows();
        let id = next_id(&rows);
        rows.push(StoredRecord {
            id,
            session_id: session_id.to_string(),
            question: Some(pair.question),
            answer: Some(pair.answer),
        });
        Ok(id)
    }

    async fn sessions(&self) -> Result<Vec<String>> {
        Ok(session_ids(&self.rows()))
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Store backed by a single JSON file.
///
/// A missing file reads as an empty store; the file and its parent
/// directories are created on first append.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, rows: &[StoredRecord]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(rows).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, json).await.map_err(io_err)
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn fetch(&self, session_id: &str) -> Result<Vec<QnAPair>> {
        let rows = self.load().await?;
        let pairs = session_rows(&rows, session_id);
        tracing::debug!(
            session_id,
            count = pairs.len(),
            "loaded session from {}",
            self.path.display()
        );
        Ok(pairs)
    }

    async fn append(&self, session_id: &str, pair: QnAPair) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load().await?;
        let id = next_id(&rows);
        rows.push(StoredRecord {
            id,
            session_id: session_id.to_string(),
            question: Some(pair.question),
            answer: Some(pair.answer),
        });
        self.save(&rows).await?;
        Ok(id)
    }

    async fn sessions(&self) -> Result<Vec<String>> {
        Ok(session_ids(&self.load().await?))
    }
}
