use anyhow::{anyhow, Result};
use reqwest::Client;

use crate::models::{ChatReply, ChatRequest};

/// HTTP client for the shop backend's `/chat` endpoint. Cloned into each
/// request task, so submissions in flight share the same connection pool.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One question/answer round trip. Any failure (connection error, bad
    /// status, unparseable body) comes back as a single error class; there is
    /// no timeout and no retry.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String> {
        let url = format!("{}/chat", self.base_url);

        let request = ChatRequest {
            question: question.to_string(),
            context: context.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Chat request failed with status: {}",
                response.status()
            ));
        }

        let reply: ChatReply = response.json().await?;
        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_response_field_on_success() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Hi there"}"#)
            .create_async()
            .await;

        let client = ChatClient::new(&server.url());
        let result = client.ask("hello", "").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn sends_question_and_context_as_json() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/chat")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "question": "any rpgs?",
                "context": "You:\nany rpgs?\n\n",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Sure"}"#)
            .create_async()
            .await;

        let client = ChatClient::new(&server.url());
        let result = client.ask("any rpgs?", "You:\nany rpgs?\n\n").await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/chat")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = ChatClient::new(&server.url());
        let result = client.ask("hello", "").await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("500"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn unparseable_body_is_a_failure() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json at all")
            .create_async()
            .await;

        let client = ChatClient::new(&server.url());
        assert!(client.ask("hello", "").await.is_err());
    }

    #[tokio::test]
    async fn reply_without_the_response_field_is_a_failure() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer": "Hi there"}"#)
            .create_async()
            .await;

        let client = ChatClient::new(&server.url());
        assert!(client.ask("hello", "").await.is_err());
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let client = ChatClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
