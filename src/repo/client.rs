use async_trait::async_trait;
use reqwest::Response;

use crate::error::{Error, Result};
use crate::models::{Anchors, RepoRef};

/// Operations the reviewer needs from a source-control host.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Unified diff of the pull request.
    async fn fetch_diff(&self, repo: &RepoRef, pull_request_id: u64) -> Result<String>;

    async fn post_comment(&self, repo: &RepoRef, pull_request_id: u64, text: &str) -> Result<()>;

    /// Reads the description, merges `text` into it and writes it back.
    async fn append_description(
        &self,
        repo: &RepoRef,
        pull_request_id: u64,
        text: &str,
        anchors: Option<&Anchors>,
    ) -> Result<()>;

    fn name(&self) -> &str;
}

/// Passes successful responses through and maps the rest onto [`Error`].
pub(crate) async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::from_status(status, what, body))
}

/// Rejects blank diffs; an empty pull request has nothing to review.
pub(crate) fn non_empty_diff(diff: String, what: &str) -> Result<String> {
    if diff.trim().is_empty() {
        return Err(Error::EmptyResult(format!("{} returned an empty diff", what)));
    }
    Ok(diff)
}
