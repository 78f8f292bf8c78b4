//! LINE Messaging API push provider.

use super::MessagingProvider;
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_LINE_API_URL: &str = "https://api.line.me";

#[derive(Clone, Default)]
pub struct LineConfig {
    /// Channel access token. Optional at startup; every push fails without it.
    pub channel_access_token: Option<String>,
    /// API base URL, without a trailing slash.
    pub api_url: String,
}

impl LineConfig {
    pub fn new(channel_access_token: impl Into<String>) -> Self {
        Self {
            channel_access_token: Some(channel_access_token.into()),
            api_url: DEFAULT_LINE_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.channel_access_token.is_some()
    }

    fn push_url(&self) -> String {
        format!("{}/v2/bot/message/push", self.api_url)
    }
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field(
                "channel_access_token",
                &self.channel_access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl FromEnv for LineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            channel_access_token: env_optional("LINE_CHANNEL_ACCESS_TOKEN"),
            api_url: env_or_default("LINE_API_URL", DEFAULT_LINE_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

pub struct LineProvider {
    config: LineConfig,
    client: Client,
}

impl LineProvider {
    pub fn new(config: LineConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn with_client(config: LineConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[async_trait]
impl MessagingProvider for LineProvider {
    async fn push_text(&self, to: &str, text: &str) -> NotificationResult<()> {
        let token = self.config.channel_access_token.as_deref().ok_or_else(|| {
            NotificationError::ConfigError("LINE_CHANNEL_ACCESS_TOKEN not set".to_string())
        })?;

        let request = PushRequest {
            to,
            messages: [TextMessage { kind: "text", text }],
        };

        debug!(to = %to, "Pushing message via LINE");

        let response = self
            .client
            .post(self.config.push_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        debug!(to = %to, status = %status, body = %body, "LINE push rejected");
        Err(NotificationError::ProviderError(format!(
            "LINE API returned {}: {}",
            status, body
        )))
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> LineProvider {
        LineProvider::new(LineConfig::new("test-token").with_api_url(server.uri()))
    }

    #[tokio::test]
    async fn push_sends_text_message_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "to": "U123",
                "messages": [{"type": "text", "text": "read your book"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider_for(&server).push_text("U123", "read your book").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"message":"Invalid reply token"}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .push_text("U123", "hi")
            .await
            .unwrap_err();
        match err {
            NotificationError::ProviderError(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("Invalid reply token"));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_token_fails_without_calling_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = LineConfig {
            channel_access_token: None,
            api_url: server.uri(),
        };
        let err = LineProvider::new(config)
            .push_text("U123", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::ConfigError(_)));
    }

    #[test]
    fn config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("LINE_CHANNEL_ACCESS_TOKEN", None::<&str>),
                ("LINE_API_URL", None),
            ],
            || {
                let config = LineConfig::from_env().unwrap();
                assert!(!config.is_configured());
                assert_eq!(config.api_url, DEFAULT_LINE_API_URL);
            },
        );
    }

    #[test]
    fn config_from_env_reads_token_and_trims_url() {
        temp_env::with_vars(
            [
                ("LINE_CHANNEL_ACCESS_TOKEN", Some("abc")),
                ("LINE_API_URL", Some("http://localhost:9000/")),
            ],
            || {
                let config = LineConfig::from_env().unwrap();
                assert_eq!(config.channel_access_token.as_deref(), Some("abc"));
                assert_eq!(config.push_url(), "http://localhost:9000/v2/bot/message/push");
            },
        );
    }

    #[test]
    fn debug_redacts_token() {
        let config = LineConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
