use crate::error::{DigestError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub path: String,
    pub added_lines: u32,
    pub deleted_lines: u32,
    pub is_binary: bool,
}

/// One observed commit, normalized. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub files_changed: Vec<String>,
    pub insertions: u64,
    pub deletions: u64,
    pub lines_changed: u64,
}

impl CommitRecord {
    /// Builds a record from commit metadata and the per-file diff of that commit.
    pub fn from_parts(info: CommitInfo, files: &[FileStats]) -> Self {
        let insertions: u64 = files.iter().map(|f| f.added_lines as u64).sum();
        let deletions: u64 = files.iter().map(|f| f.deleted_lines as u64).sum();

        Self {
            id: info.id,
            author_name: info.author_name,
            author_email: info.author_email,
            message: info.message.trim().to_string(),
            timestamp: info.timestamp,
            files_changed: files.iter().map(|f| f.path.clone()).collect(),
            insertions,
            deletions,
            lines_changed: insertions + deletions,
        }
    }
}

/// Structured output of the external statistics tool. Supplementary only,
/// it never feeds the aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectorData {
    #[serde(default)]
    pub authors: Vec<serde_json::Value>,
    #[serde(default)]
    pub file_types: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub timeline: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl InspectorData {
    pub fn from_raw_text(raw: String) -> Self {
        Self {
            raw_text: Some(raw),
            ..Self::default()
        }
    }
}

/// Everything collected for a single repository.
#[derive(Debug, Clone)]
pub struct RepositoryData {
    pub name: String,
    pub path: PathBuf,
    pub inspector: Option<InspectorData>,
    /// Newest first.
    pub commits: Vec<CommitRecord>,
}

impl RepositoryData {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            path,
            inspector: None,
            commits: Vec::new(),
        }
    }
}

/// Inclusive time range analyzed during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AnalysisWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(DigestError::InvalidDate(format!(
                "Invalid range: start ({}) is after end ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to `end`.
    pub fn last_days(end: DateTime<Utc>, days: u32) -> Result<Self> {
        let start = Duration::try_days(days as i64)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                DigestError::InvalidDate(format!("{days} days before {end} is out of range"))
            })?;
        Ok(Self { start, end })
    }

    /// Whole days between start and end, rounded down.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        timestamp >= &self.start && timestamp <= &self.end
    }
}
