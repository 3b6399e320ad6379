use super::document::{AuthorStats, ReportDocument, RepositoryStats};
use crate::util::with_thousands;
use std::fmt::{self, Write};

pub const TOP_REPOSITORY_COUNT: usize = 5;
pub const TOP_CONTRIBUTOR_COUNT: usize = 5;

/// First `n` repositories in document order. Not re-sorted.
pub fn top_repositories(repositories: &[RepositoryStats], n: usize) -> &[RepositoryStats] {
    &repositories[..repositories.len().min(n)]
}

/// First `n` contributors; the document already orders them by commits.
pub fn top_contributors(authors: &[AuthorStats], n: usize) -> &[AuthorStats] {
    &authors[..authors.len().min(n)]
}

/// Templated markdown report built only from `doc`.
///
/// Used whenever the language model cannot produce a report. Identical
/// documents always render to identical text.
pub fn fallback_report(doc: &ReportDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render(doc, &mut out);
    out
}

fn render(doc: &ReportDocument, out: &mut String) -> fmt::Result {
    let overall = &doc.overall_stats;
    let summary = &doc.summary;
    let window = &doc.time_window;

    writeln!(out, "# Git Repository Analysis Report")?;
    writeln!(out)?;
    writeln!(out, "## Executive Summary")?;
    writeln!(
        out,
        "Analysis of {} repositories from {} to {}.",
        summary.total_repositories, window.start_date, window.end_date
    )?;
    writeln!(out)?;
    writeln!(out, "## Overall Activity")?;
    writeln!(out, "- **Total Commits**: {}", overall.total_commits)?;
    writeln!(out, "- **Total Contributors**: {}", summary.total_authors)?;
    writeln!(out, "- **Total Repositories**: {}", summary.total_repositories)?;
    writeln!(out, "- **Lines Added**: {}", with_thousands(overall.total_insertions as i64))?;
    writeln!(out, "- **Lines Removed**: {}", with_thousands(overall.total_deletions as i64))?;
    writeln!(out, "- **Net Lines Changed**: {}", with_thousands(overall.net_lines))?;
    writeln!(out)?;
    writeln!(out, "## Repository Summary")?;

    for repo in top_repositories(&doc.repository_stats, TOP_REPOSITORY_COUNT) {
        writeln!(out)?;
        writeln!(out, "### {}", repo.name)?;
        writeln!(out, "- Commits: {}", repo.total_commits)?;
        writeln!(out, "- Contributors: {}", repo.unique_authors)?;
        writeln!(out, "- Files Changed: {}", repo.total_files_changed)?;
        writeln!(out, "- Net Lines: {}", with_thousands(repo.net_lines))?;
    }

    writeln!(out)?;
    writeln!(out, "## Top Contributors")?;

    for (i, author) in top_contributors(&doc.author_stats, TOP_CONTRIBUTOR_COUNT)
        .iter()
        .enumerate()
    {
        writeln!(out)?;
        writeln!(out, "{}. **{}**", i + 1, author.name)?;
        writeln!(out, "   - Commits: {}", author.total_commits)?;
        writeln!(out, "   - Lines Added: {}", with_thousands(author.total_insertions as i64))?;
        writeln!(out, "   - Lines Removed: {}", with_thousands(author.total_deletions as i64))?;
        writeln!(out, "   - Files Changed: {}", author.total_files_changed)?;
    }

    writeln!(out)?;
    writeln!(out, "---")?;
    write!(out, "*Report generated by gitdigest*")
}
