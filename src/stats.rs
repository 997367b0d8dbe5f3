use crate::analyzer::RepoCommitSummary;

/// Totals over one user's results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub repos: usize,
    pub commits_total: usize,
}

impl Stats {
    pub fn from_summaries(summaries: &[RepoCommitSummary]) -> Self {
        Self {
            repos: summaries.len(),
            commits_total: summaries.iter().map(|s| s.commit_count).sum(),
        }
    }

    pub fn average(&self) -> f64 {
        if self.repos == 0 {
            0.0
        } else {
            self.commits_total as f64 / self.repos as f64
        }
    }
}
