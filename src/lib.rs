//! Per-repository commit counts for a GitHub user.
//!
//! [`Analyzer`] lists a user's repositories through a [`RepoSource`] and then
//! counts commits repository by repository. [`render::format_output`] turns the
//! result into text.

pub mod analyzer;
pub mod error;
pub mod github;
pub mod render;
pub mod stats;

pub use analyzer::{Analyzer, RepoCommitSummary};
pub use error::GithubError;
pub use github::{ClientConfig, GithubClient, RepoSource, Repository};
