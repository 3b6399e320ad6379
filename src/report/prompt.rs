use super::document::ReportDocument;
use crate::error::Result;

pub const SYSTEM_PROMPT: &str = "You are a technical report writer specializing in Git repository analysis.

Your task is to create comprehensive, well-structured reports based on Git repository statistics and commit data. The reports should be:

1. **Professional and Clear**: Use clear, professional language suitable for engineering teams and management
2. **Well-Structured**: Organize information logically with clear sections and subsections
3. **Insightful**: Provide meaningful analysis, not just raw statistics
4. **Actionable**: Where appropriate, suggest insights or observations that could be useful

Report Structure:
- Executive Summary (2-3 sentences)
- Overall Repository Activity
- Repository-Specific Analysis
- Individual Contributor Analysis
- Key Insights and Observations

Use markdown formatting for better readability. Focus on trends, patterns, and notable contributions rather than just listing numbers.";

pub fn user_prompt(doc: &ReportDocument) -> Result<String> {
    let window = &doc.time_window;

    Ok(format!(
        "Please generate a comprehensive Git repository analysis report for the period from {start} to {end} ({days} days).

Here is the data to analyze:

## Overall Statistics
{overall}

## Summary
{summary}

## Repository Details
{repos}

## Author Contributions
{authors}

## Time Window
{window_json}

Please create a report that includes:
1. An executive summary highlighting the most important findings
2. Overall activity analysis (total commits, contributors, repositories)
3. Per-repository breakdown with key metrics
4. Individual contributor analysis with their key contributions
5. Notable patterns, trends, or insights from the data

Make the report engaging and informative for both technical and non-technical stakeholders.",
        start = window.start_date,
        end = window.end_date,
        days = window.duration_days,
        overall = serde_json::to_string_pretty(&doc.overall_stats)?,
        summary = serde_json::to_string_pretty(&doc.summary)?,
        repos = serde_json::to_string_pretty(&doc.repository_stats)?,
        authors = serde_json::to_string_pretty(&doc.author_stats)?,
        window_json = serde_json::to_string_pretty(window)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::tests::sample_analysis;

    #[test]
    fn user_prompt_embeds_every_section() {
        let doc = ReportDocument::from_analysis(&sample_analysis());
        let prompt = user_prompt(&doc).unwrap();
        assert!(prompt.contains("(7 days)"));
        assert!(prompt.contains("## Overall Statistics\n{"));
        assert!(prompt.contains("\"avg_commits_per_repo\""));
        assert!(prompt.contains("\"recent_commits\""));
        assert!(prompt.contains("\"recent_commit_messages\""));
        assert!(prompt.contains("\"duration_days\": 7"));
    }
}
