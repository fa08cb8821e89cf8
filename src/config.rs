use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::{Anchors, ProviderKind};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_START_ANCHOR: &str = "<!-- pr-review-ai:start -->";
pub const DEFAULT_END_ANCHOR: &str = "<!-- pr-review-ai:end -->";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub openai: OpenAiConfig,
    pub github: GitHubConfig,
    pub bitbucket: BitbucketConfig,
    pub anchors: Anchors,
    pub review: bool,
    pub code_comments: bool,
    pub score: bool,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct BitbucketConfig {
    pub token: Option<String>,
    pub workspace: Option<String>,
    pub api_url: String,
}

impl Config {
    /// Checks that the credentials needed by the selected provider are present.
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.trim().is_empty() {
            return Err(Error::Config(
                "OpenAI API key not set (--openai-api-key or OPENAI_API_KEY)".to_string(),
            ));
        }

        let token = match self.provider {
            ProviderKind::GitHub => &self.github.token,
            ProviderKind::Bitbucket => &self.bitbucket.token,
        };
        if token.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            let (flag, var) = match self.provider {
                ProviderKind::GitHub => ("--github-token", "GITHUB_TOKEN"),
                ProviderKind::Bitbucket => ("--bitbucket-token", "BITBUCKET_TOKEN"),
            };
            return Err(Error::Config(format!(
                "{} token not set ({} or {})",
                self.provider, flag, var
            )));
        }

        if self.anchors.start.is_empty() || self.anchors.end.is_empty() {
            return Err(Error::Config("anchors must not be empty".to_string()));
        }
        if self.anchors.start == self.anchors.end {
            return Err(Error::Config(
                "start and end anchors must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Owner (GitHub) or workspace (Bitbucket) used when the repo slug has none.
    pub fn default_owner(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::GitHub => self.github.owner.as_deref(),
            ProviderKind::Bitbucket => self.bitbucket.workspace.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub model: String,
    pub anchors: Anchors,
    pub review: bool,
    pub code_comments: bool,
    pub score: bool,
}

impl From<&Config> for ReviewConfig {
    fn from(config: &Config) -> Self {
        Self {
            model: config.openai.model.clone(),
            anchors: config.anchors.clone(),
            review: config.review,
            code_comments: config.code_comments,
            score: config.score,
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            anchors: Anchors::default(),
            review: false,
            code_comments: false,
            score: false,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config(provider: ProviderKind) -> Config {
    Config {
        provider,
        openai: OpenAiConfig {
            api_key: "sk-test".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        },
        github: GitHubConfig {
            token: Some("gh-token".to_string()),
            owner: Some("acme".to_string()),
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
        },
        bitbucket: BitbucketConfig {
            token: Some("bb-token".to_string()),
            workspace: Some("acme-team".to_string()),
            api_url: DEFAULT_BITBUCKET_API_URL.to_string(),
        },
        anchors: Anchors::default(),
        review: false,
        code_comments: false,
        score: false,
        request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
