pub mod client;
pub mod description;
pub mod github;
pub mod bitbucket;

pub use client::RepositoryClient;
pub use description::{merge_description, AUTHOR_NOTES_HEADER};
pub use github::GitHubClient;
pub use bitbucket::BitbucketClient;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::ProviderKind;

/// Builds the client for the configured provider. Called once per run.
pub fn build_repository_client(config: &Config) -> Result<Box<dyn RepositoryClient>> {
    match config.provider {
        ProviderKind::GitHub => {
            let token = config
                .github
                .token
                .as_deref()
                .ok_or_else(|| Error::Config("GitHub token not set".to_string()))?;
            Ok(Box::new(GitHubClient::new(
                token,
                &config.github.api_url,
                config.request_timeout,
            )?))
        }
        ProviderKind::Bitbucket => {
            let token = config
                .bitbucket
                .token
                .as_deref()
                .ok_or_else(|| Error::Config("Bitbucket token not set".to_string()))?;
            Ok(Box::new(BitbucketClient::new(
                token,
                &config.bitbucket.api_url,
                config.request_timeout,
            )?))
        }
    }
}
