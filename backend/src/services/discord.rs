//! Discord REST client
//!
//! Posts messages to a channel with a bot token, and registers the
//! application's slash commands. Only the endpoints the service needs are
//! implemented.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{ApplicationCommand, ChatMessage};

/// Bound on a single Discord API call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Discord rejected the message with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Destination for chat messages
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_message(&self, channel_id: u64, message: &ChatMessage) -> Result<(), ChatError>;
}

#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl DiscordClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                "DiscordBot (https://github.com/mergeboard, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()
            .map_err(ChatError::Client)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Replace the application's global slash commands with `commands`.
    ///
    /// Discord treats the PUT as an overwrite, so running this on every
    /// start is safe.
    pub async fn register_commands(
        &self,
        application_id: u64,
        commands: &[ApplicationCommand],
    ) -> Result<(), ChatError> {
        let url = format!("{}/applications/{application_id}/commands", self.api_url);
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(commands)
            .send()
            .await?;

        ensure_success(response).await
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<(), ChatError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ChatError::Rejected { status, body });
    }
    Ok(())
}

#[async_trait]
impl ChatSink for DiscordClient {
    async fn send_message(&self, channel_id: u64, message: &ChatMessage) -> Result<(), ChatError> {
        let url = format!("{}/channels/{channel_id}/messages", self.api_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(message)
            .send()
            .await?;

        ensure_success(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Accept one request, capture it whole, answer with `status_line`.
    async fn capture_once(status_line: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => n,
                };
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let content_length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .and_then(|v| v.trim().parse::<usize>().ok())
                        })
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + content_length {
                        break;
                    }
                }
            }
            let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}"
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}"), rx)
    }

    #[tokio::test]
    async fn posts_message_with_bot_authorization() {
        let (base, request) = capture_once("200 OK").await;
        let client = DiscordClient::new(&base, "token-123").unwrap();

        client
            .send_message(42, &ChatMessage::text("hello"))
            .await
            .unwrap();

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /channels/42/messages HTTP/1.1"), "{raw}");
        assert!(raw.to_lowercase().contains("authorization: bot token-123"));
        assert!(raw.ends_with(r#"{"content":"hello"}"#), "{raw}");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (base, _request) = capture_once("403 Forbidden").await;
        let client = DiscordClient::new(&base, "token-123").unwrap();

        let err = client
            .send_message(42, &ChatMessage::text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ChatError::Rejected { status: StatusCode::FORBIDDEN, .. }
        ));
    }

    #[tokio::test]
    async fn registers_commands_with_bulk_overwrite() {
        let (base, request) = capture_once("200 OK").await;
        let client = DiscordClient::new(&base, "token-123").unwrap();

        client
            .register_commands(
                987,
                &[ApplicationCommand::chat_input("leaderboard", "Show the top contributors")],
            )
            .await
            .unwrap();

        let raw = request.await.unwrap();
        assert!(raw.starts_with("PUT /applications/987/commands HTTP/1.1"), "{raw}");
        assert!(raw.to_lowercase().contains("authorization: bot token-123"));
        assert!(
            raw.ends_with(
                r#"[{"name":"leaderboard","description":"Show the top contributors","type":1}]"#
            ),
            "{raw}"
        );
    }

    #[tokio::test]
    async fn rejected_registration_is_reported() {
        let (base, _request) = capture_once("401 Unauthorized").await;
        let client = DiscordClient::new(&base, "bad-token").unwrap();

        let err = client.register_commands(987, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Rejected { status: StatusCode::UNAUTHORIZED, .. }
        ));
    }

    #[test]
    fn debug_output_hides_token() {
        let client = DiscordClient::new("https://discord.com/api/v10", "token-123").unwrap();
        assert!(!format!("{client:?}").contains("token-123"));
    }
}
