//! Nova chat service client implementation

use std::time::Duration;

use async_trait::async_trait;
use nova_core::{BackendError, ChatBackend, Message};

use crate::models::{ChatRequest, ChatResponse, ErrorBody, HealthResponse, ServerConfig};
use crate::{DEFAULT_NOVA_URL, DEFAULT_REQUEST_TIMEOUT, NovaClientError, Result};

/// Client for the Nova chat service
#[derive(Debug, Clone)]
pub struct NovaClient {
    client: reqwest::Client,
    base_url: String,
}

impl NovaClient {
    /// Create a client for the server at `base_url` (e.g. "http://127.0.0.1:5000")
    ///
    /// No request is made; use [`NovaClient::health`] to probe the server.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create a client for the default local server
    pub fn new_default() -> Result<Self> {
        Self::new(DEFAULT_NOVA_URL)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Send the conversation and get the assistant reply
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.url("chat"))
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            let chat_response: ChatResponse = response.json().await?;
            tracing::debug!(
                mode = ?chat_response.mode,
                chars = chat_response.text().len(),
                "chat reply received"
            );
            Ok(chat_response)
        } else {
            Err(Self::server_error(response).await)
        }
    }

    /// Fetch the model currently served
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(self.url("health"))
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            let health: HealthResponse = response.json().await?;
            if !health.ok {
                return Err(NovaClientError::InvalidResponse(
                    "server reported it is not healthy".to_string(),
                ));
            }
            Ok(health)
        } else {
            Err(Self::server_error(response).await)
        }
    }

    /// Fetch the generation parameters of the server
    pub async fn config(&self) -> Result<ServerConfig> {
        let response = self
            .client
            .get(self.url("config"))
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::server_error(response).await)
        }
    }

    async fn server_error(response: reqwest::Response) -> NovaClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        NovaClientError::ServerError { status, message }
    }
}

fn send_error(err: reqwest::Error) -> NovaClientError {
    if err.is_connect() {
        tracing::debug!("connection to Nova server failed: {}", err);
        NovaClientError::ConnectionError
    } else {
        NovaClientError::RequestError(err)
    }
}

#[async_trait]
impl ChatBackend for NovaClient {
    async fn send_chat(&self, history: &[Message]) -> std::result::Result<String, BackendError> {
        let request = ChatRequest::from_history(history);
        let response = self.chat(&request).await?;
        if response.is_blocked() {
            tracing::info!("request was refused by the server");
        }
        Ok(response.reply.unwrap_or_default())
    }

    async fn health(&self) -> std::result::Result<String, BackendError> {
        Ok(NovaClient::health(self).await?.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatMessage, ReplyMode};
    use nova_core::MessageId;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_chat_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({
                "messages": [{"role": "user", "content": "Hello!"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "reply": "Hello! How can I help you?",
                "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21},
                "mode": "general"
            })))
            .mount(&server)
            .await;

        let client = NovaClient::new(server.uri()).expect("client");
        let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
        let response = client.chat(&request).await.expect("chat");
        assert_eq!(response.text(), "Hello! How can I help you?");
        assert_eq!(response.mode, Some(ReplyMode::General));
    }

    #[tokio::test]
    async fn test_chat_bad_request_surfaces_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "messages[] required"})),
            )
            .mount(&server)
            .await;

        let client = NovaClient::new(server.uri()).expect("client");
        let err = client
            .chat(&ChatRequest::new(Vec::new()))
            .await
            .unwrap_err();
        match err {
            NovaClientError::ServerError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "messages[] required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_with_plain_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let client = NovaClient::new(server.uri()).expect("client");
        let err = client.health().await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("down for maintenance"));
    }

    #[tokio::test]
    async fn test_health_and_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "model": "gpt-3.5-turbo"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.6,
                "max_tokens": 900
            })))
            .mount(&server)
            .await;

        let client = NovaClient::new(format!("{}/", server.uri())).expect("client");
        let health = client.health().await.expect("health");
        assert!(health.ok);
        assert_eq!(health.model, "gpt-3.5-turbo");

        let config = client.config().await.expect("config");
        assert_eq!(config.max_tokens, 900);
        assert!((config.temperature - 0.6).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_chat_backend_impl() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hey"},
                    {"role": "user", "content": "table?"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"reply": "| a |", "mode": "general"})),
            )
            .mount(&server)
            .await;

        let client = NovaClient::new(server.uri()).expect("client");
        let history = vec![
            Message::user(MessageId(1), "hi"),
            Message::assistant(MessageId(2), "hey"),
            Message::user(MessageId(3), "table?"),
        ];
        let reply = ChatBackend::send_chat(&client, &history)
            .await
            .expect("reply");
        assert_eq!(reply, "| a |");
    }

    #[tokio::test]
    async fn test_unreachable_server_maps_to_backend_error() {
        // Port 9 (discard) is almost never listening.
        let client = NovaClient::new("http://127.0.0.1:9").expect("client");
        let err = ChatBackend::health(&client).await.unwrap_err();
        assert!(matches!(err, BackendError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_unhealthy_server_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": false, "model": "gpt-3.5-turbo"})),
            )
            .mount(&server)
            .await;

        let client = NovaClient::new(server.uri()).expect("client");
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, NovaClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_base_url() {
        let client = NovaClient::new("http://localhost:5000").expect("client");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("chat"), "http://localhost:5000/api/chat");

        let client = NovaClient::new("https://example.com/nova/").expect("client");
        assert_eq!(client.url("health"), "https://example.com/nova/api/health");
    }
}
