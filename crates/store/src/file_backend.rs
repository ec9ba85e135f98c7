//! File-based store: a JSON knowledge base plus JSON-lines fact rows.
//!
//! Layout under the data directory:
//!
//! - `knowledge.json`: the whole knowledge base as one JSON array, rewritten
//!   on every save (full-collection replace).
//! - `facts.jsonl`: one `FactRow` per line. Corrupt lines are skipped with a
//!   warning.

use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use storepilot_core::error::StoreError;
use storepilot_core::knowledge::KnowledgeEntry;
use storepilot_core::series::FactRow;
use storepilot_core::store::{FactStore, KnowledgeStore};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const KNOWLEDGE_FILE: &str = "knowledge.json";
pub const FACTS_FILE: &str = "facts.jsonl";

pub struct FileStore {
    dir: PathBuf,
    append_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn knowledge_path(&self) -> PathBuf {
        self.dir.join(KNOWLEDGE_FILE)
    }

    pub fn facts_path(&self) -> PathBuf {
        self.dir.join(FACTS_FILE)
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to create data directory: {e}")))
    }

    /// Read a file, treating "not found" as empty.
    async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Parse JSON-lines fact rows, skipping lines that do not decode.
    fn parse_fact_lines(content: &str) -> Vec<FactRow> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str::<FactRow>(line) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(line = n + 1, error = %e, "Skipping corrupted fact row");
                    None
                }
            })
            .collect()
    }

    /// Append rows to `facts.jsonl`.
    ///
    /// Only the new lines are written, through an append-mode handle. Appends
    /// through one store are serialized.
    pub async fn append_fact_rows(&self, rows: &[FactRow]) -> Result<usize, StoreError> {
        let mut buf = String::new();
        for row in rows {
            let line = serde_json::to_string(row).map_err(|e| StoreError::Decode {
                what: "fact row".into(),
                reason: e.to_string(),
            })?;
            buf.push_str(&line);
            buf.push('\n');
        }
        if buf.is_empty() {
            return Ok(0);
        }

        self.ensure_dir().await?;
        let _guard = self.append_lock.lock().await;

        let path = self.facts_path();
        let io_err = |e: std::io::Error| {
            StoreError::Storage(format!("Failed to append fact rows to {}: {e}", path.display()))
        };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_err)?;

        // A hand-edited file may lack its final newline.
        if file.metadata().await.map_err(io_err)?.len() > 0 {
            file.seek(SeekFrom::End(-1)).await.map_err(io_err)?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last).await.map_err(io_err)?;
            if last[0] != b'\n' {
                buf.insert(0, '\n');
            }
        }

        file.write_all(buf.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!(count = rows.len(), "Appended fact rows");
        Ok(rows.len())
    }
}

#[async_trait]
impl KnowledgeStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load_knowledge_base(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let path = self.knowledge_path();
        let Some(content) = Self::read_optional(&path).await? else {
            debug!(path = %path.display(), "No knowledge base file yet");
            return Ok(Vec::new());
        };

        serde_json::from_str(&content).map_err(|e| StoreError::Decode {
            what: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn save_knowledge_base(&self, entries: &[KnowledgeEntry]) -> Result<(), StoreError> {
        self.ensure_dir().await?;

        let json = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Decode {
            what: "knowledge base".into(),
            reason: e.to_string(),
        })?;

        // Write-then-rename: readers only ever see a complete file.
        let tmp = self.dir.join(format!("{KNOWLEDGE_FILE}.tmp"));
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to write knowledge base: {e}")))?;
        tokio::fs::rename(&tmp, self.knowledge_path())
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to replace knowledge base: {e}")))?;

        debug!(count = entries.len(), "Knowledge base saved");
        Ok(())
    }
}

#[async_trait]
impl FactStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn query_fact_rows(&self, start: &str, end: &str) -> Result<Vec<FactRow>, StoreError> {
        let Some(content) = Self::read_optional(&self.facts_path()).await? else {
            return Ok(Vec::new());
        };

        Ok(Self::parse_fact_lines(&content)
            .into_iter()
            .filter(|r| r.date.as_str() >= start && r.date.as_str() <= end)
            .collect())
    }
}
