use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::error::{Error, Result};
use crate::models::{
    Anchors, BitbucketComment, BitbucketContent, BitbucketDescriptionUpdate, BitbucketNewComment,
    BitbucketPullRequest, RepoRef,
};
use crate::repo::client::{ensure_success, non_empty_diff, RepositoryClient};
use crate::repo::description::merge_description;

/// Bitbucket Cloud client. `RepoRef::owner` is the workspace.
pub struct BitbucketClient {
    client: Client,
    base_url: String,
}

impl BitbucketClient {
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
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
            "{}/repositories/{}/{}/pullrequests/{}",
            self.base_url, repo.owner, repo.name, pull_request_id
        )
    }
}

#[async_trait]
impl RepositoryClient for BitbucketClient {
    async fn fetch_diff(&self, repo: &RepoRef, pull_request_id: u64) -> Result<String> {
        let url = format!("{}/diff", self.pull_url(repo, pull_request_id));
        tracing::info!("Fetching diff for {}#{}", repo, pull_request_id);

        // The diff endpoint answers with a redirect to the repository diff; reqwest follows it.
        let response = self.client.get(&url).send().await?;
        let what = format!("pull request {}#{}", repo, pull_request_id);
        let response = ensure_success(response, &what).await?;

        non_empty_diff(response.text().await?, &what)
    }

    async fn post_comment(&self, repo: &RepoRef, pull_request_id: u64, text: &str) -> Result<()> {
        let url = format!("{}/comments", self.pull_url(repo, pull_request_id));
        let body = BitbucketNewComment {
            content: BitbucketContent { raw: text },
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let response = ensure_success(response, &format!("comments of {}#{}", repo, pull_request_id)).await?;
        // The comment exists once the status is 2xx; the body only feeds the log line.
        match response.json::<BitbucketComment>().await.ok() {
            Some(comment) => tracing::info!("Comment posted successfully: id {}", comment.id),
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
        let anchors = anchors.ok_or_else(|| Error::MissingAnchors(self.name().to_string()))?;

        let url = self.pull_url(repo, pull_request_id);
        let what = format!("pull request {}#{}", repo, pull_request_id);
        let response = self.client.get(&url).send().await?;
        let pull_request: BitbucketPullRequest = ensure_success(response, &what).await?.json().await?;

        let existing = pull_request.description.as_deref();
        let merged = merge_description(existing, text, Some(anchors));
        if existing == Some(merged.as_str()) {
            tracing::info!("Description of {} already up to date", what);
            return Ok(());
        }

        let response = self
            .client
            .put(&url)
            .json(&BitbucketDescriptionUpdate {
                description: &merged,
            })
            .send()
            .await?;
        ensure_success(response, &what).await?;

        tracing::info!("Description appended successfully.");
        Ok(())
    }

    fn name(&self) -> &str {
        "Bitbucket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn repo() -> RepoRef {
        RepoRef::parse("widgets", Some("acme-team")).unwrap()
    }

    fn client(server: &Server) -> BitbucketClient {
        BitbucketClient::new("bb-token", &server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_diff() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/12/diff")
            .match_header("authorization", "Bearer bb-token")
            .with_status(200)
            .with_body("diff --git a/y b/y\n-old\n+new\n")
            .create_async()
            .await;

        let diff = client(&server).fetch_diff(&repo(), 12).await.unwrap();
        assert!(diff.contains("+new"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_diff_forbidden_is_auth_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/12/diff")
            .with_status(403)
            .create_async()
            .await;

        let result = client(&server).fetch_diff(&repo(), 12).await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn test_fetch_diff_missing_or_blank() {
        let mut server = Server::new_async().await;
        let _not_found = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/404/diff")
            .with_status(404)
            .create_async()
            .await;
        let _blank = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/13/diff")
            .with_status(200)
            .with_body("  \n")
            .create_async()
            .await;

        let client = client(&server);
        assert!(matches!(client.fetch_diff(&repo(), 404).await, Err(Error::NotFound(_))));
        assert!(matches!(client.fetch_diff(&repo(), 13).await, Err(Error::EmptyResult(_))));
    }

    #[tokio::test]
    async fn test_post_comment_wraps_raw_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/repositories/acme-team/widgets/pullrequests/12/comments")
            .match_body(Matcher::Json(json!({ "content": { "raw": "Nice work" } })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": 99 }).to_string())
            .create_async()
            .await;

        client(&server)
            .post_comment(&repo(), 12, "Nice work")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_comment_succeeds_without_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/repositories/acme-team/widgets/pullrequests/12/comments")
            .with_status(201)
            .with_body("")
            .create_async()
            .await;

        let result = client(&server).post_comment(&repo(), 12, "Nice work").await;
        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_description_replaces_anchored_region() {
        let mut server = Server::new_async().await;
        let anchors = Anchors::new("<s>", "<e>");
        let _get = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/12")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "id": 12, "description": "Hello\n<s>\nold\n<e>\nWorld" }).to_string(),
            )
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/repositories/acme-team/widgets/pullrequests/12")
            .match_body(Matcher::Json(json!({
                "description": "## Author Notes\n\nHello\n<s>\nnew\n<e>\nWorld"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": 12 }).to_string())
            .create_async()
            .await;

        client(&server)
            .append_description(&repo(), 12, "new", Some(&anchors))
            .await
            .unwrap();
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_description_puts_merged_description() {
        let mut server = Server::new_async().await;
        let anchors = Anchors::new("<s>", "<e>");
        let _get = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/12")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": 12, "description": "Adds caching" }).to_string())
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/repositories/acme-team/widgets/pullrequests/12")
            .match_body(Matcher::Json(json!({
                "description": "## Author Notes\n\nAdds caching\n\n<s>\nsummary\n<e>"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": 12 }).to_string())
            .create_async()
            .await;

        client(&server)
            .append_description(&repo(), 12, "summary", Some(&anchors))
            .await
            .unwrap();
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_description_requires_anchors() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/repositories/acme-team/widgets/pullrequests/12")
            .expect(0)
            .create_async()
            .await;

        let result = client(&server)
            .append_description(&repo(), 12, "summary", None)
            .await;
        assert!(matches!(result, Err(Error::MissingAnchors(_))));
        get.assert_async().await;
    }
}
