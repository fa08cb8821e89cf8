use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub prompt: String,
    /// Ask the endpoint to constrain the answer to a JSON object.
    pub json_output: bool,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
    fn name(&self) -> &str;
}
