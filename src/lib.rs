pub mod config;
pub mod error;
pub mod models;
pub mod repo;
pub mod llm;
pub mod review;

pub use config::{Config, ReviewConfig};
pub use error::{Error, Result};
pub use repo::{build_repository_client, RepositoryClient};
pub use llm::{ChatCompletion, OpenAiProvider};
pub use review::ReviewOrchestrator;
