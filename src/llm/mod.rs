pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;

pub use provider::{ChatCompletion, CompletionRequest};
pub use openai::OpenAiProvider;
pub use prompts::{PromptKind, SYSTEM_PROMPT};
pub use parser::parse_review_score;
