use anyhow::{Result, bail};
use clap::Parser;
use repo_commits::github::DEFAULT_BASE_URL;
use repo_commits::render::{format_output, format_stats};
use repo_commits::stats::Stats;
use repo_commits::{
    Analyzer, ClientConfig, GithubClient, GithubError, RepoCommitSummary, RepoSource,
};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// List a GitHub user's repositories with the number of commits in each.
#[derive(Parser, Debug)]
#[command(name = "repo-commits", version)]
struct Cli {
    /// GitHub usernames to inspect, processed in order
    #[arg(required = true)]
    usernames: Vec<String>,

    /// REST API root
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Print totals and the average after the listing
    #[arg(long)]
    summary: bool,

    /// Print all results as a single JSON document
    #[arg(long, conflicts_with = "summary")]
    json: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct OutputOptions {
    summary: bool,
    json: bool,
}

/// One entry of the `--json` document.
#[derive(Serialize)]
#[serde(untagged)]
enum UserReport<'a> {
    Repos {
        username: &'a str,
        repos: Vec<RepoCommitSummary>,
    },
    Failed {
        username: &'a str,
        error: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = GithubClient::new(ClientConfig {
        base_url: cli.base_url.clone(),
        timeout: Duration::from_secs(cli.timeout),
    });
    let analyzer = Analyzer::with_client(client);
    let opts = OutputOptions {
        summary: cli.summary,
        json: cli.json,
    };

    let failed = run(
        &analyzer,
        &cli.usernames,
        opts,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .await?;

    if failed > 0 {
        bail!("{failed} of {} users could not be analyzed", cli.usernames.len());
    }

    Ok(())
}

/// Analyze every user in order and return how many of them failed.
async fn run<C: RepoSource>(
    analyzer: &Analyzer<C>,
    usernames: &[String],
    opts: OutputOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<usize> {
    let mut failed = 0usize;
    let mut reports = Vec::new();

    for username in usernames {
        if !opts.json {
            writeln!(out, "Fetching repositories for {username}...")?;
        }

        let repo_info = match analyzer.get_user_repo_commit_info(username).await {
            Ok(repo_info) => repo_info,
            Err(e) => {
                failed += 1;
                report_error(err, username, &e)?;
                if opts.json {
                    reports.push(UserReport::Failed {
                        username,
                        error: e.to_string(),
                    });
                }
                continue;
            }
        };

        if opts.json {
            reports.push(UserReport::Repos {
                username,
                repos: repo_info,
            });
            continue;
        }

        if repo_info.is_empty() {
            writeln!(out, "No repositories found for user: {username}")?;
            continue;
        }

        writeln!(out, "Found {} repositories:\n", repo_info.len())?;
        writeln!(out, "{}", format_output(&repo_info))?;
        if opts.summary {
            writeln!(out, "\n{}", format_stats(&Stats::from_summaries(&repo_info)))?;
        }
    }

    if opts.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
    }

    Ok(failed)
}

fn report_error(err: &mut impl Write, username: &str, e: &GithubError) -> io::Result<()> {
    if !e.is_rate_limited() {
        return writeln!(err, "GitHub API error for {username}: {e}");
    }

    writeln!(err, "Rate limit error for {username}: {e}")?;
    match e.reset_at() {
        Some(at) => writeln!(err, "Quota resets at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => writeln!(err, "Wait a while or authenticate for a higher rate limit"),
    }
}
