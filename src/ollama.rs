//! Ollama backend implementation.
//!
//! Ollama is a local LLM server; zsh-warrior makes one non-streaming
//! `/api/chat` call per invocation.

use crate::config::Config;
use crate::protocol::{ChatMessage, ChatOptions, ChatRequest, ChatResponse, ErrorBody};
use anyhow::{Context, Result};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Failure talking to the Ollama server.
#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("failed to connect to Ollama at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message} (status code: {status})")]
    Status { status: u16, message: String },
    #[error("failed to parse Ollama response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Ollama client bound to one endpoint, model and temperature.
pub struct OllamaClient {
    pub model: String,
    pub temperature: f64,
    host: String,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            model: config.model.clone(),
            temperature: config.temperature,
            host: config.endpoint.clone(),
            client,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host.trim_end_matches('/'))
    }

    /// Send the messages and return the reply text (empty if Ollama sent none).
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, OllamaError> {
        let url = self.chat_url();

        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        debug!("POST {} (model {})", url, self.model);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| OllamaError::Connect {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(OllamaError::Decode)?;
        Ok(chat.into_content())
    }
}

/// Pick the most useful description of a failed request.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(endpoint: &str) -> OllamaClient {
        let config = Config {
            endpoint: endpoint.to_string(),
            ..Config::default()
        };
        OllamaClient::new(&config).unwrap()
    }

    #[test]
    fn test_chat_url() {
        assert_eq!(
            client_for("http://localhost:11434").chat_url(),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            client_for("http://localhost:11434/").chat_url(),
            "http://localhost:11434/api/chat"
        );
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(
                reqwest::StatusCode::NOT_FOUND,
                r#"{"error":"model 'x' not found"}"#
            ),
            "model 'x' not found"
        );
        assert_eq!(
            error_message(reqwest::StatusCode::BAD_GATEWAY, "  upstream down \n"),
            "upstream down"
        );
        assert_eq!(
            error_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_chat_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "qwen2.5-coder:3b",
                "stream": false,
                "options": { "temperature": 0.5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "ls -la" },
                "done": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let reply = client.chat(&[ChatMessage::user("list files")]).await.unwrap();
        assert_eq!(reply, "ls -la");
    }

    #[tokio::test]
    async fn test_chat_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "error": "model 'nope' not found" })),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server.uri())
            .chat(&[ChatMessage::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, OllamaError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "model 'nope' not found (status code: 404)");
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server.uri())
            .chat(&[ChatMessage::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, OllamaError::Decode(_)));
    }

    #[tokio::test]
    async fn test_chat_connection_refused() {
        let err = client_for("http://127.0.0.1:1")
            .chat(&[ChatMessage::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, OllamaError::Connect { .. }));
        assert!(err.to_string().starts_with("failed to connect to Ollama at http://127.0.0.1:1/api/chat"));
    }
}
