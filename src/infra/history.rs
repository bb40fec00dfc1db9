//! Append-only history of processed prompt/response pairs.
//!
//! JSON-lines on disk: read fully at start, appended exactly one row per
//! successful run. A prompt id that appears here is never reprocessed.
//! Appends take a cross-process write lock so overlapping cron runs cannot
//! interleave rows.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::pipeline::Prompt;

/// One processed prompt/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub prompt_id: String,
    pub prompt_text: String,
    pub response_id: String,
    pub response_text: String,
    pub posted_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(prompt: &Prompt, response_text: &str, response_id: &str) -> Self {
        Self {
            prompt_id: prompt.id.clone(),
            prompt_text: prompt.text.clone(),
            response_id: response_id.to_string(),
            response_text: response_text.to_string(),
            posted_at: Utc::now(),
        }
    }
}

/// In-memory view over the history file with O(1) id membership.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<HistoryRecord>,
    ids: HashSet<String>,
}

impl HistoryStore {
    /// Load the full history. A missing file is an empty store; the file
    /// itself is created on first append.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut records = Vec::new();

        if path.exists() {
            let file = File::open(&path)
                .with_context(|| format!("failed to open history at {}", path.display()))?;

            for (lineno, line) in BufReader::new(file).lines().enumerate() {
                let line = line.context("failed to read history line")?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: HistoryRecord = serde_json::from_str(&line).with_context(|| {
                    format!("malformed history row at {}:{}", path.display(), lineno + 1)
                })?;
                records.push(record);
            }
        }

        let ids = records.iter().map(|r| r.prompt_id.clone()).collect();
        Ok(Self { path, records, ids })
    }

    /// Whether this prompt id was already processed.
    pub fn contains(&self, prompt_id: &str) -> bool {
        self.ids.contains(prompt_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Append one record to disk and to the in-memory view.
    ///
    /// The write happens under an exclusive advisory lock, so concurrent
    /// runs append whole rows or block; rows never interleave.
    pub fn append(&mut self, record: &HistoryRecord) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history at {}", self.path.display()))?;

        let mut lock = RwLock::new(file);
        {
            let mut guard = lock
                .write()
                .context("failed to lock history for append")?;
            let mut line =
                serde_json::to_string(record).context("failed to encode history record")?;
            line.push('\n');
            guard
                .write_all(line.as_bytes())
                .context("failed to append history record")?;
            guard.flush().context("failed to flush history")?;
        }

        self.records.push(record.clone());
        self.ids.insert(record.prompt_id.clone());
        Ok(())
    }
}
