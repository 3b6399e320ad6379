use crate::aggregate::{
    Analysis, AuthorAggregate, AuthorCommits, RepositoryAggregate, TimelineEntry,
};
use crate::util::{most_common, RankedCounts};
use serde::{Deserialize, Serialize};

pub const REPOSITORY_FILE_TYPES: usize = 10;
pub const AUTHOR_FILE_TYPES: usize = 5;
pub const OVERALL_FILE_TYPES: usize = 10;

/// Serialized view of one run, handed to the report composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub overall_stats: OverallStats,
    pub summary: Summary,
    pub repository_stats: Vec<RepositoryStats>,
    pub author_stats: Vec<AuthorStats>,
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_commits: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub total_repositories: usize,
    pub total_authors: usize,
    pub top_file_types: RankedCounts,
    pub top_authors_by_commits: Vec<AuthorCommits>,
    pub avg_commits_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_commits: usize,
    pub total_authors: usize,
    pub total_repositories: usize,
    pub avg_commits_per_author: f64,
    pub avg_commits_per_repo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub name: String,
    pub path: String,
    pub total_commits: usize,
    pub unique_authors: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub total_files_changed: usize,
    pub top_file_types: RankedCounts,
    pub recent_commits: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub name: String,
    pub email: String,
    pub total_commits: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub total_files_changed: usize,
    pub repositories: Vec<String>,
    pub top_file_types: RankedCounts,
    pub recent_commit_messages: Vec<String>,
    pub first_commit_date: Option<String>,
    pub last_commit_date: Option<String>,
    pub active_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_date: String,
    pub end_date: String,
    pub duration_days: i64,
}

impl ReportDocument {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let overall = &analysis.overall;

        Self {
            overall_stats: OverallStats {
                total_commits: overall.total_commits,
                total_insertions: overall.total_insertions,
                total_deletions: overall.total_deletions,
                net_lines: overall.net_lines(),
                total_repositories: overall.total_repositories,
                total_authors: overall.total_authors,
                top_file_types: most_common(&overall.file_types, OVERALL_FILE_TYPES),
                top_authors_by_commits: overall.top_authors.clone(),
                avg_commits_per_day: overall.avg_commits_per_day,
            },
            summary: summarize(&analysis.repositories, analysis.authors.len()),
            repository_stats: analysis.repositories.iter().map(RepositoryStats::from).collect(),
            author_stats: analysis.authors.iter().map(AuthorStats::from).collect(),
            time_window: TimeWindow {
                start_date: analysis.window.start.to_rfc3339(),
                end_date: analysis.window.end.to_rfc3339(),
                duration_days: analysis.window.duration_days(),
            },
        }
    }

}

fn summarize(repositories: &[RepositoryAggregate], total_authors: usize) -> Summary {
    let total_commits: usize = repositories.iter().map(|r| r.total_commits).sum();
    let total_repositories = repositories.len();
    let per = |divisor: usize| {
        if divisor > 0 {
            total_commits as f64 / divisor as f64
        } else {
            0.0
        }
    };

    Summary {
        total_commits,
        total_authors,
        total_repositories,
        avg_commits_per_author: per(total_authors),
        avg_commits_per_repo: per(total_repositories),
    }
}

impl From<&RepositoryAggregate> for RepositoryStats {
    fn from(repo: &RepositoryAggregate) -> Self {
        Self {
            name: repo.name.clone(),
            path: repo.path.to_string_lossy().to_string(),
            total_commits: repo.total_commits,
            unique_authors: repo.unique_authors(),
            total_insertions: repo.total_insertions,
            total_deletions: repo.total_deletions,
            net_lines: repo.net_lines(),
            total_files_changed: repo.unique_files(),
            top_file_types: most_common(&repo.file_types, REPOSITORY_FILE_TYPES),
            recent_commits: repo.timeline.clone(),
        }
    }
}

impl From<&AuthorAggregate> for AuthorStats {
    fn from(author: &AuthorAggregate) -> Self {
        Self {
            name: author.name.clone(),
            email: author.email.clone(),
            total_commits: author.total_commits,
            total_insertions: author.total_insertions,
            total_deletions: author.total_deletions,
            net_lines: author.net_lines(),
            total_files_changed: author.total_files_changed,
            repositories: author.repositories.iter().cloned().collect(),
            top_file_types: most_common(&author.file_types, AUTHOR_FILE_TYPES),
            recent_commit_messages: author.recent_messages.clone(),
            first_commit_date: author.first_commit.map(|d| d.to_rfc3339()),
            last_commit_date: author.last_commit.map(|d| d.to_rfc3339()),
            active_days: author.active_days(),
        }
    }
}
