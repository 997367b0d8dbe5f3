//! Plain-text rendering of analyzer results.
//!
//! `format_output` is a stable contract: one `Repo: {name} Number of commits: {n}`
//! line per repository, newline separated, no trailing newline.

use crate::analyzer::RepoCommitSummary;
use crate::stats::Stats;

pub const NO_REPOSITORIES: &str = "No repositories found.";

pub fn format_output(summaries: &[RepoCommitSummary]) -> String {
    if summaries.is_empty() {
        return NO_REPOSITORIES.to_string();
    }

    summaries
        .iter()
        .map(|s| format!("Repo: {} Number of commits: {}", s.repo_name, s.commit_count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "Summary:\n\
         - Total repositories: {}\n\
         - Total commits: {}\n\
         - Average commits per repo: {:.1}",
        stats.repos,
        stats.commits_total,
        stats.average()
    )
}
