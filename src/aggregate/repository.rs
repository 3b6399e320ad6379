use crate::model::CommitRecord;
use crate::util::{count_extensions, truncate_chars};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

pub const TIMELINE_LIMIT: usize = 20;
pub const TIMELINE_MESSAGE_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub author: String,
    pub message: String,
    pub changes: u64,
}

#[derive(Debug, Clone)]
pub struct RepositoryAggregate {
    pub name: String,
    pub path: PathBuf,
    pub total_commits: usize,
    pub author_emails: HashSet<String>,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub files: HashSet<String>,
    pub file_types: HashMap<String, usize>,
    pub timeline: Vec<TimelineEntry>,
}

impl RepositoryAggregate {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            total_commits: 0,
            author_emails: HashSet::new(),
            total_insertions: 0,
            total_deletions: 0,
            files: HashSet::new(),
            file_types: HashMap::new(),
            timeline: Vec::new(),
        }
    }

    /// Folds `commits`, which the caller supplies newest first.
    pub fn from_commits(name: String, path: PathBuf, commits: &[CommitRecord]) -> Self {
        let mut agg = Self::new(name, path);
        for commit in commits {
            agg.add_commit(commit);
        }
        agg
    }

    pub fn add_commit(&mut self, commit: &CommitRecord) {
        self.total_commits += 1;
        // Email is the identity key here, unlike the per-author fold.
        self.author_emails.insert(commit.author_email.clone());
        self.total_insertions += commit.insertions;
        self.total_deletions += commit.deletions;
        self.files.extend(commit.files_changed.iter().cloned());
        count_extensions(&mut self.file_types, &commit.files_changed);

        if self.timeline.len() < TIMELINE_LIMIT {
            self.timeline.push(TimelineEntry {
                date: commit.timestamp,
                author: commit.author_name.clone(),
                message: truncate_chars(&commit.message, TIMELINE_MESSAGE_CHARS),
                changes: commit.lines_changed,
            });
        }
    }

    pub fn unique_authors(&self) -> usize {
        self.author_emails.len()
    }

    pub fn unique_files(&self) -> usize {
        self.files.len()
    }

    pub fn net_lines(&self) -> i64 {
        self.total_insertions as i64 - self.total_deletions as i64
    }
}
