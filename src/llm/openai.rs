use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::prompts::SYSTEM_PROMPT;
use crate::llm::provider::{ChatCompletion, CompletionRequest};

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            "Sending {} prompt chars to {} (temperature {})",
            request.prompt.len(),
            request.model,
            request.temperature
        );

        let body = ChatRequest {
            model: &request.model,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            response_format: request.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(Error::Llm(format!("OpenAI API error ({}): {}", status, message)));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        let text = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::EmptyResult("Empty response from OpenAI".to_string()));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn provider(server: &Server) -> OpenAiProvider {
        OpenAiProvider::new("sk-test".to_string(), &server.url(), Duration::from_secs(5)).unwrap()
    }

    fn request(json_output: bool) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            prompt: "Review this".to_string(),
            json_output,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_persona_and_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "Review this" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "choices": [{ "message": { "role": "assistant", "content": "LGTM" } }] })
                    .to_string(),
            )
            .create_async()
            .await;

        let text = provider(&server).complete(request(false)).await.unwrap();
        assert_eq!(text, "LGTM");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_requests_json_object_format() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "response_format": { "type": "json_object" }
            })))
            .with_status(200)
            .with_body(
                json!({ "choices": [{ "message": { "content": "{\"score\": 9}" } }] }).to_string(),
            )
            .create_async()
            .await;

        let text = provider(&server).complete(request(true)).await.unwrap();
        assert_eq!(text, "{\"score\": 9}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_error_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(json!({ "error": { "message": "Incorrect API key" } }).to_string())
            .create_async()
            .await;

        match provider(&server).complete(request(false)).await {
            Err(Error::Llm(message)) => assert!(message.contains("Incorrect API key")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_empty_content_is_empty_result() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({ "choices": [{ "message": { "content": null } }] }).to_string())
            .create_async()
            .await;

        let result = provider(&server).complete(request(false)).await;
        assert!(matches!(result, Err(Error::EmptyResult(_))));
    }
}
