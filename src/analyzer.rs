use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::github::{GithubClient, RepoSource};

/// Commit count for one repository. `commit_count` is 0 when the commit listing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCommitSummary {
    pub repo_name: String,
    pub commit_count: usize,
}

impl RepoCommitSummary {
    pub fn new(repo_name: impl Into<String>, commit_count: usize) -> Self {
        Self {
            repo_name: repo_name.into(),
            commit_count,
        }
    }
}

pub struct Analyzer<C = GithubClient> {
    client: C,
}

impl Analyzer<GithubClient> {
    /// Analyzer backed by a default `GithubClient`.
    pub fn new() -> Self {
        Self::with_client(GithubClient::default())
    }
}

impl Default for Analyzer<GithubClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RepoSource> Analyzer<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// One summary per repository of `username`, in listing order.
    ///
    /// A failed repository listing is returned as-is. A failed commit listing is
    /// logged and recorded as zero commits for that repository.
    pub async fn get_user_repo_commit_info(
        &self,
        username: &str,
    ) -> Result<Vec<RepoCommitSummary>> {
        let repos = self.client.list_repositories(username).await?;
        if repos.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = Vec::with_capacity(repos.len());
        for repo in repos {
            let commit_count = match self.client.list_commits(username, &repo.name).await {
                Ok(commits) => commits.len(),
                Err(e) => {
                    warn!(repo = %repo.name, "Could not get commits for {}: {e}", repo.name);
                    0
                }
            };
            out.push(RepoCommitSummary {
                repo_name: repo.name,
                commit_count,
            });
        }

        Ok(out)
    }
}
