use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_END_ANCHOR, DEFAULT_START_ANCHOR};

/// Literal markers delimiting the tool-managed region of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    pub start: String,
    pub end: String,
}

impl Anchors {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Default for Anchors {
    fn default() -> Self {
        Self::new(DEFAULT_START_ANCHOR, DEFAULT_END_ANCHOR)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GitHubBodyUpdate<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GitHubNewComment<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubComment {
    pub id: u64,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitbucketPullRequest {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BitbucketDescriptionUpdate<'a> {
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BitbucketNewComment<'a> {
    pub content: BitbucketContent<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BitbucketContent<'a> {
    pub raw: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitbucketComment {
    pub id: u64,
}
