pub mod author;
pub mod overall;
pub mod repository;

pub use author::{AuthorAggregate, AuthorAggregator};
pub use overall::{avg_commits_per_day, top_authors, AuthorCommits, OverallAggregate};
pub use repository::{RepositoryAggregate, TimelineEntry};

use crate::model::{AnalysisWindow, RepositoryData};
use tracing::debug;

/// Every aggregate produced by one run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub window: AnalysisWindow,
    pub repositories: Vec<RepositoryAggregate>,
    /// Sorted by commit count, descending.
    pub authors: Vec<AuthorAggregate>,
    pub overall: OverallAggregate,
}

pub fn analyze(repositories: &[RepositoryData], window: AnalysisWindow) -> Analysis {
    let mut repo_aggs = Vec::with_capacity(repositories.len());
    let mut authors = AuthorAggregator::new();

    for repo in repositories {
        let agg =
            RepositoryAggregate::from_commits(repo.name.clone(), repo.path.clone(), &repo.commits);
        debug!(
            repository = %repo.name,
            commits = agg.total_commits,
            authors = agg.unique_authors(),
            "aggregated repository"
        );
        repo_aggs.push(agg);
        authors.fold_all(&repo.commits, &repo.name);
    }

    let authors = authors.finish();
    let overall = OverallAggregate::compute(&repo_aggs, &authors, &window);

    Analysis {
        window,
        repositories: repo_aggs,
        authors,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommitRecord;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn single_commit_end_to_end() {
        let end = Utc.with_ymd_and_hms(2024, 9, 9, 12, 0, 0).unwrap();
        let window = AnalysisWindow::last_days(end, 7).unwrap();

        let mut repo = RepositoryData::new(PathBuf::from("/src/service"));
        repo.commits.push(CommitRecord {
            id: "0f1e2d".into(),
            author_name: "Lin".into(),
            author_email: "lin@example.com".into(),
            message: "Add report".into(),
            timestamp: end - Duration::days(1),
            files_changed: vec!["a.py".into(), "b.md".into()],
            insertions: 50,
            deletions: 10,
            lines_changed: 60,
        });

        let analysis = analyze(&[repo], window);

        let r = &analysis.repositories[0];
        assert_eq!(r.name, "service");
        assert_eq!(r.total_commits, 1);
        assert_eq!(r.unique_authors(), 1);
        assert_eq!(r.net_lines(), 40);
        assert_eq!(r.file_types.len(), 2);
        assert_eq!(r.file_types["py"], 1);
        assert_eq!(r.file_types["md"], 1);

        let a = &analysis.authors[0];
        assert_eq!(a.total_commits, 1);
        assert_eq!(a.total_files_changed, 2);
        assert_eq!(a.active_days(), 1);

        assert_eq!(analysis.overall.avg_commits_per_day, 1.0 / 7.0);
        assert_eq!(analysis.overall.top_authors.len(), 1);
    }

    #[test]
    fn authors_fold_across_repositories() {
        let end = Utc.with_ymd_and_hms(2024, 9, 9, 12, 0, 0).unwrap();
        let window = AnalysisWindow::last_days(end, 7).unwrap();
        let commit = CommitRecord {
            id: "1".into(),
            author_name: "Lin".into(),
            author_email: "lin@example.com".into(),
            message: "m".into(),
            timestamp: end,
            files_changed: vec![],
            insertions: 1,
            deletions: 0,
            lines_changed: 1,
        };

        let mut a = RepositoryData::new(PathBuf::from("/src/a"));
        a.commits.push(commit.clone());
        let mut b = RepositoryData::new(PathBuf::from("/src/b"));
        b.commits.push(commit);

        let analysis = analyze(&[a, b], window);
        assert_eq!(analysis.authors.len(), 1);
        assert_eq!(analysis.authors[0].total_commits, 2);
        assert_eq!(analysis.authors[0].repositories.len(), 2);
        assert_eq!(analysis.overall.total_commits, 2);
    }
}
