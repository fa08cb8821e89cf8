use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pr_review_ai::config::{
    BitbucketConfig, GitHubConfig, OpenAiConfig, DEFAULT_BITBUCKET_API_URL, DEFAULT_END_ANCHOR,
    DEFAULT_GITHUB_API_URL, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_START_ANCHOR,
    DEFAULT_TIMEOUT_SECS,
};
use pr_review_ai::models::{Anchors, ProviderKind, RepoRef};
use pr_review_ai::{
    build_repository_client, Config, OpenAiProvider, ReviewConfig, ReviewOrchestrator,
};

#[derive(Parser, Debug)]
#[command(name = "pr-review-ai")]
#[command(version)]
#[command(about = "Summarize and review a pull request with an LLM, then write the result back")]
struct Args {
    /// Pull request ID
    #[arg(long, env = "PULL_REQUEST_ID")]
    pull_request_id: u64,

    /// Repository, as owner/name or just name (owner taken from --github-owner / --bitbucket-workspace)
    #[arg(long, env = "REPO")]
    repo: String,

    /// Repository provider: github or bitbucket
    #[arg(long, env = "REPO_PROVIDER", default_value = "github")]
    repo_provider: ProviderKind,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,

    /// Chat model used for every pass
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub owner used when --repo has no owner
    #[arg(long, env = "GITHUB_OWNER")]
    github_owner: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    github_api_url: String,

    /// Bitbucket token
    #[arg(long, env = "BITBUCKET_TOKEN", hide_env_values = true)]
    bitbucket_token: Option<String>,

    /// Bitbucket workspace used when --repo has no workspace
    #[arg(long, env = "BITBUCKET_WORKSPACE")]
    bitbucket_workspace: Option<String>,

    /// Bitbucket API base URL
    #[arg(long, env = "BITBUCKET_API_URL", default_value = DEFAULT_BITBUCKET_API_URL)]
    bitbucket_api_url: String,

    /// Marker opening the generated region of the description
    #[arg(long, default_value = DEFAULT_START_ANCHOR)]
    start_anchor: String,

    /// Marker closing the generated region of the description
    #[arg(long, default_value = DEFAULT_END_ANCHOR)]
    end_anchor: String,

    /// Also post a code review comment
    #[arg(long)]
    review: bool,

    /// Also post suggested documentation comments for undocumented functions
    #[arg(long)]
    code_comments: bool,

    /// Also post a 1-10 quality score
    #[arg(long)]
    score: bool,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            provider: args.repo_provider,
            openai: OpenAiConfig {
                api_key: args.openai_api_key,
                base_url: args.openai_base_url,
                model: args.model,
            },
            github: GitHubConfig {
                token: args.github_token,
                owner: args.github_owner,
                api_url: args.github_api_url,
            },
            bitbucket: BitbucketConfig {
                token: args.bitbucket_token,
                workspace: args.bitbucket_workspace,
                api_url: args.bitbucket_api_url,
            },
            anchors: Anchors::new(args.start_anchor, args.end_anchor),
            review: args.review,
            code_comments: args.code_comments,
            score: args.score,
            request_timeout: Duration::from_secs(args.timeout_secs),
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "pr_review_ai=info,reqwest=warn";

/// `RUST_LOG` wins when set and valid; otherwise the crate logs at info.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env fallbacks and RUST_LOG is consulted
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let args = Args::parse();
    let pull_request_id = args.pull_request_id;
    let slug = args.repo.clone();

    let config = Config::from(args);
    config.validate()?;

    let repo = RepoRef::parse(&slug, config.default_owner())?;

    // Initialize clients
    let repository = build_repository_client(&config)?;
    let llm = OpenAiProvider::new(
        config.openai.api_key.clone(),
        &config.openai.base_url,
        config.request_timeout,
    )?;

    let orchestrator = ReviewOrchestrator::new(repository, llm, ReviewConfig::from(&config));

    tracing::info!(
        "Reviewing {} pull request {}#{} with {}",
        config.provider,
        repo,
        pull_request_id,
        config.openai.model
    );
    let outcome = orchestrator.run(&repo, pull_request_id).await?;

    tracing::info!(
        "Done: description updated: {}, review posted: {}, code comments posted: {}, score: {}",
        outcome.description_updated,
        outcome.review_posted,
        outcome.code_comments_posted,
        outcome
            .score
            .as_ref()
            .map(|s| format!("{}/10", s.score))
            .unwrap_or_else(|| "-".to_string())
    );

    Ok(())
}
