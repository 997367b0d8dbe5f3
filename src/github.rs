use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{GithubError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Entry of `GET /users/{username}/repos`. Only the name is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`. Never inspected, only counted.
pub type Commit = Value;

/// The two listing calls the analyzer needs.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn list_repositories(&self, username: &str) -> Result<Vec<Repository>>;

    async fn list_commits(&self, username: &str, repo_name: &str) -> Result<Vec<Commit>>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct GithubClient {
    base_url: Arc<String>,
    timeout: Duration,
    http: Arc<Client>,
}

/// What a request was fetching; drives the wording of error messages.
enum Resource<'a> {
    Repos { username: &'a str },
    Commits { username: &'a str, repo: &'a str },
}

impl Resource<'_> {
    fn not_found(&self) -> String {
        match self {
            Resource::Repos { username } => format!("User '{username}' not found"),
            Resource::Commits { username, repo } => {
                format!("Repository '{username}/{repo}' not found")
            }
        }
    }

    fn timed_out(&self) -> String {
        match self {
            Resource::Repos { username } => {
                format!("Timeout while fetching repositories for {username}")
            }
            Resource::Commits { username, repo } => {
                format!("Timeout while fetching commits for {username}/{repo}")
            }
        }
    }
}

impl GithubClient {
    /// Create a REST client with its own HTTP connection pool.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http(config, Client::new())
    }

    /// Create a REST client on top of an existing `reqwest::Client`.
    pub fn with_http(config: ClientConfig, http: Client) -> Self {
        Self {
            base_url: Arc::new(config.base_url.trim_end_matches('/').to_string()),
            timeout: config.timeout,
            http: Arc::new(http),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `{base_url}/{segments...}` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = || GithubError::Api(format!("Invalid base URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode the JSON body, classifying every failure into a `GithubError`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: Resource<'_>) -> Result<T> {
        debug!(%url, "GET");

        let resp = self
            .http
            .get(url.clone())
            .timeout(self.timeout)
            .header(USER_AGENT, "repo-commits")
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GithubError::Api(resource.timed_out())
                } else {
                    GithubError::Api(format!("Network error: {e}"))
                }
            })?;

        classify(resp.status(), resp.headers(), &resource, url.as_str())?;

        resp.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                GithubError::Api(resource.timed_out())
            } else {
                GithubError::Api(format!("Failed to parse JSON from GitHub: {e}"))
            }
        })
    }
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn list_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&["users", username, "repos"])?;
        self.get_json(url, Resource::Repos { username }).await
    }

    async fn list_commits(&self, username: &str, repo_name: &str) -> Result<Vec<Commit>> {
        let url = self.endpoint(&["repos", username, repo_name, "commits"])?;
        self.get_json(
            url,
            Resource::Commits {
                username,
                repo: repo_name,
            },
        )
        .await
    }
}

/// Map an HTTP status to success or an error.
///
/// GitHub reports an exhausted quota as a 403, so the rate-limit check must run
/// before anything else looks at the status. Only an exact `"0"` counts.
fn classify(
    status: StatusCode,
    headers: &HeaderMap,
    resource: &Resource<'_>,
    url: &str,
) -> Result<()> {
    if status == StatusCode::FORBIDDEN {
        let remaining = headers
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok());
        if remaining == Some("0") {
            let reset = headers
                .get(RATE_LIMIT_RESET)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Err(GithubError::RateLimitExceeded { reset });
        }
    }

    if status == StatusCode::NOT_FOUND {
        return Err(GithubError::NotFound(resource.not_found()));
    }

    if !status.is_success() {
        return Err(GithubError::Api(format!(
            "GitHub API returned HTTP {} for {url}",
            status.as_u16()
        )));
    }

    Ok(())
}
