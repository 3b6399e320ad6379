use super::author::AuthorAggregate;
use super::repository::RepositoryAggregate;
use crate::model::AnalysisWindow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const TOP_AUTHOR_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorCommits {
    pub name: String,
    pub commits: usize,
}

#[derive(Debug, Clone)]
pub struct OverallAggregate {
    pub total_commits: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub total_repositories: usize,
    pub total_authors: usize,
    pub file_types: HashMap<String, usize>,
    pub top_authors: Vec<AuthorCommits>,
    pub avg_commits_per_day: f64,
}

impl OverallAggregate {
    /// `authors` must already be sorted by commit count.
    pub fn compute(
        repositories: &[RepositoryAggregate],
        authors: &[AuthorAggregate],
        window: &AnalysisWindow,
    ) -> Self {
        let total_commits: usize = repositories.iter().map(|r| r.total_commits).sum();
        let total_insertions: u64 = repositories.iter().map(|r| r.total_insertions).sum();
        let total_deletions: u64 = repositories.iter().map(|r| r.total_deletions).sum();

        // Built from repository histograms only; author histograms are not reconciled.
        let mut file_types: HashMap<String, usize> = HashMap::new();
        for repo in repositories {
            for (ext, count) in &repo.file_types {
                *file_types.entry(ext.clone()).or_insert(0) += count;
            }
        }

        Self {
            total_commits,
            total_insertions,
            total_deletions,
            total_repositories: repositories.len(),
            total_authors: authors.len(),
            file_types,
            top_authors: top_authors(authors, TOP_AUTHOR_COUNT),
            avg_commits_per_day: avg_commits_per_day(total_commits, window),
        }
    }

    pub fn net_lines(&self) -> i64 {
        self.total_insertions as i64 - self.total_deletions as i64
    }
}

/// First `n` authors of an already sorted sequence, as (name, commits).
pub fn top_authors(authors: &[AuthorAggregate], n: usize) -> Vec<AuthorCommits> {
    authors
        .iter()
        .take(n)
        .map(|a| AuthorCommits {
            name: a.name.clone(),
            commits: a.total_commits,
        })
        .collect()
}

/// Window length is floored at one day, so a same-day window yields the total.
pub fn avg_commits_per_day(total_commits: usize, window: &AnalysisWindow) -> f64 {
    total_commits as f64 / window.duration_days().max(1) as f64
}
