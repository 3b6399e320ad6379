use crate::model::CommitRecord;
use crate::util::count_extensions;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

pub const RECENT_MESSAGE_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct AuthorAggregate {
    pub name: String,
    pub email: String,
    pub total_commits: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    /// Sum of files per commit; a file touched in three commits counts three times.
    pub total_files_changed: usize,
    pub repositories: BTreeSet<String>,
    pub file_types: HashMap<String, usize>,
    pub recent_messages: Vec<String>,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
}

impl AuthorAggregate {
    pub fn new(name: String, email: String) -> Self {
        Self {
            name,
            email,
            total_commits: 0,
            total_insertions: 0,
            total_deletions: 0,
            total_files_changed: 0,
            repositories: BTreeSet::new(),
            file_types: HashMap::new(),
            recent_messages: Vec::new(),
            first_commit: None,
            last_commit: None,
        }
    }

    pub fn add_commit(&mut self, commit: &CommitRecord, repo_name: &str) {
        self.total_commits += 1;
        self.total_insertions += commit.insertions;
        self.total_deletions += commit.deletions;
        self.total_files_changed += commit.files_changed.len();
        self.repositories.insert(repo_name.to_string());
        if self.recent_messages.len() < RECENT_MESSAGE_LIMIT {
            self.recent_messages.push(commit.message.clone());
        }
        count_extensions(&mut self.file_types, &commit.files_changed);

        if self.first_commit.map_or(true, |first| commit.timestamp < first) {
            self.first_commit = Some(commit.timestamp);
        }
        if self.last_commit.map_or(true, |last| commit.timestamp > last) {
            self.last_commit = Some(commit.timestamp);
        }
    }

    pub fn net_lines(&self) -> i64 {
        self.total_insertions as i64 - self.total_deletions as i64
    }

    /// Calendar span of activity, inclusive of both ends. Zero without commits.
    pub fn active_days(&self) -> i64 {
        match (self.first_commit, self.last_commit) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        }
    }
}

/// Folds commits from every repository into per-author totals.
///
/// Authors are keyed by `name:email`, so one email under two spellings of a
/// name produces two aggregates. Nothing is canonicalized.
#[derive(Debug, Default)]
pub struct AuthorAggregator {
    index: HashMap<String, usize>,
    authors: Vec<AuthorAggregate>,
}

impl AuthorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, commit: &CommitRecord, repo_name: &str) {
        let key = format!("{}:{}", commit.author_name, commit.author_email);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.authors.push(AuthorAggregate::new(
                    commit.author_name.clone(),
                    commit.author_email.clone(),
                ));
                self.index.insert(key, self.authors.len() - 1);
                self.authors.len() - 1
            }
        };
        self.authors[idx].add_commit(commit, repo_name);
    }

    pub fn fold_all<'a>(
        &mut self,
        commits: impl IntoIterator<Item = &'a CommitRecord>,
        repo_name: &str,
    ) {
        for commit in commits {
            self.fold(commit, repo_name);
        }
    }

    /// Aggregates ordered by commit count, descending. Equal counts keep
    /// first-seen order.
    pub fn finish(self) -> Vec<AuthorAggregate> {
        let mut authors = self.authors;
        authors.sort_by(|a, b| b.total_commits.cmp(&a.total_commits));
        authors
    }
}
