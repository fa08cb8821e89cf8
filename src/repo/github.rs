use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::error::Result;
use crate::models::{
    Anchors, GitHubBodyUpdate, GitHubComment, GitHubNewComment, GitHubPullRequest, RepoRef,
};
use crate::repo::client::{ensure_success, non_empty_diff, RepositoryClient};
use crate::repo::description::merge_description;

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(JSON_MEDIA_TYPE),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("pr-review-ai/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn pull_url(&self, repo: &RepoRef, pull_request_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, repo.owner, repo.name, pull_request_id
        )
    }

    async fn get_pull_request(&self, repo: &RepoRef, pull_request_id: u64) -> Result<GitHubPullRequest> {
        let url = self.pull_url(repo, pull_request_id);
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, &format!("pull request {}#{}", repo, pull_request_id)).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn fetch_diff(&self, repo: &RepoRef, pull_request_id: u64) -> Result<String> {
        let url = self.pull_url(repo, pull_request_id);
        tracing::info!("Fetching diff for {}#{}", repo, pull_request_id);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, DIFF_MEDIA_TYPE)
            .send()
            .await?;
        let what = format!("pull request {}#{}", repo, pull_request_id);
        let response = ensure_success(response, &what).await?;

        non_empty_diff(response.text().await?, &what)
    }

    async fn post_comment(&self, repo: &RepoRef, pull_request_id: u64, text: &str) -> Result<()> {
        // Pull request conversation comments live on the issues endpoint.
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_url, repo.owner, repo.name, pull_request_id
        );

        let response = self
            .client
            .post(&url)
            .json(&GitHubNewComment { body: text })
            .send()
            .await?;
        let response = ensure_success(response, &format!("comments of {}#{}", repo, pull_request_id)).await?;
        // The comment exists once the status is 2xx; the body only feeds the log line.
        match response.json::<GitHubComment>().await.ok() {
            Some(comment) => tracing::info!(
                "Comment posted successfully: {}",
                comment.html_url.unwrap_or_else(|| format!("id {}", comment.id))
            ),
            None => tracing::info!("Comment posted successfully."),
        }
        Ok(())
    }

    async fn append_description(
        &self,
        repo: &RepoRef,
        pull_request_id: u64,
        text: &str,
        anchors: Option<&Anchors>,
    ) -> Result<()> {
        let pull_request = self.get_pull_request(repo, pull_request_id).await?;
        let existing = pull_request.body.as_deref();
        let merged = merge_description(existing, text, anchors);

        if existing == Some(merged.as_str()) {
            tracing::info!("Description of {}#{} already up to date", repo, pull_request_id);
            return Ok(());
        }

        let url = self.pull_url(repo, pull_request_id);
        let response = self
            .client
            .patch(&url)
            .json(&GitHubBodyUpdate { body: &merged })
            .send()
            .await?;
        ensure_success(response, &format!("pull request {}#{}", repo, pull_request_id)).await?;

        tracing::info!("Description appended successfully.");
        Ok(())
    }

    fn name(&self) -> &str {
        "GitHub"
    }
}
