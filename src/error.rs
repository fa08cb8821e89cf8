use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} requires start and end anchors to update a description")]
    MissingAnchors(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps a non-success HTTP status onto the error taxonomy.
    pub fn from_status(status: reqwest::StatusCode, what: &str, body: String) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Error::Auth(format!("{} ({})", what, status))
            }
            reqwest::StatusCode::NOT_FOUND => Error::NotFound(what.to_string()),
            _ => Error::Api {
                status: status.as_u16(),
                body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            Error::from_status(StatusCode::UNAUTHORIZED, "pr", String::new()),
            Error::Auth(_)
        ));
        assert!(matches!(
            Error::from_status(StatusCode::FORBIDDEN, "pr", String::new()),
            Error::Auth(_)
        ));
        assert!(matches!(
            Error::from_status(StatusCode::NOT_FOUND, "pr", String::new()),
            Error::NotFound(_)
        ));
        match Error::from_status(StatusCode::BAD_GATEWAY, "pr", "upstream".to_string()) {
            Error::Api { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
