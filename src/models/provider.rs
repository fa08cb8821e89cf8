use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Source-control host targeted by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    GitHub,
    Bitbucket,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::GitHub => write!(f, "GitHub"),
            ProviderKind::Bitbucket => write!(f, "Bitbucket"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(ProviderKind::GitHub),
            "bitbucket" => Ok(ProviderKind::Bitbucket),
            other => Err(Error::Config(format!(
                "unknown repository provider '{}' (expected github or bitbucket)",
                other
            ))),
        }
    }
}

/// A repository addressed as owner (or workspace) plus name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parses `owner/name`, or a bare `name` combined with `default_owner`.
    pub fn parse(slug: &str, default_owner: Option<&str>) -> Result<Self> {
        let slug = slug.trim().trim_matches('/');
        let (owner, name) = match slug.split_once('/') {
            Some((owner, name)) => (owner.to_string(), name.to_string()),
            None => {
                let owner = default_owner.map(str::trim).unwrap_or_default();
                (owner.to_string(), slug.to_string())
            }
        };

        if owner.is_empty() {
            return Err(Error::Config(format!(
                "repository '{}' has no owner; pass owner/name or set the owner/workspace",
                slug
            )));
        }
        if name.is_empty() || name.contains('/') {
            return Err(Error::Config(format!("invalid repository slug '{}'", slug)));
        }

        Ok(Self { owner, name })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
