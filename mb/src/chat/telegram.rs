//! Telegram Bot API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::api::ChatApi;
use super::error::ChatError;
use super::types::{BotCommand, Keyboard, Message, Update};
use crate::config::TelegramConfig;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
///
/// 429 is deliberately absent: Telegram delivers the wait time in the
/// response body, so it surfaces as `ChatError::RateLimited` instead.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504)
}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// HTTP client for the Telegram Bot API
pub struct TelegramApi {
    token: String,
    base_url: String,
    http: Client,
}

impl TelegramApi {
    /// Build a client from config, reading the token from the environment
    pub fn from_config(config: &TelegramConfig) -> Result<Self, ChatError> {
        let token = std::env::var(&config.token_env).map_err(|_| {
            ChatError::InvalidResponse(format!(
                "Environment variable {} not set",
                config.token_env
            ))
        })?;
        // Client timeout must outlast the long-poll hold time
        let timeout = Duration::from_secs(config.poll_timeout_secs + 10);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ChatError::Network)?;
        Ok(Self {
            token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// POST one Bot API method with retry on transient failures
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, ChatError> {
        let url = self.method_url(method);
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, method, "call: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.post(&url).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    debug!(attempt, method, error = %e, "call: network error");
                    last_error = Some(ChatError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, method, "call: retryable status");
                last_error = Some(ChatError::Api {
                    code: status,
                    description: text,
                });
                continue;
            }

            let envelope: ApiEnvelope<T> = response.json().await?;
            if envelope.ok {
                debug!(method, "call: success");
                return match envelope.result {
                    Some(result) => Ok(result),
                    None => Err(ChatError::InvalidResponse(format!(
                        "{}: response missing result field",
                        method
                    ))),
                };
            }

            let code = envelope.error_code.unwrap_or(status);
            if code == 429 {
                let retry_after = envelope
                    .parameters
                    .and_then(|p| p.retry_after)
                    .unwrap_or(5);
                debug!(method, retry_after, "call: rate limited");
                return Err(ChatError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            let description = envelope
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            debug!(method, code, %description, "call: API error");
            return Err(ChatError::Api { code, description });
        }

        Err(last_error
            .unwrap_or_else(|| ChatError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<Message, ChatError> {
        debug!(chat_id, "send_message: called");
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard)?;
        }
        self.call("sendMessage", body).await
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError> {
        debug!(chat_id, message_id, "edit_message_text: called");
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard)?;
        }
        let _: serde_json::Value = self.call("editMessageText", body).await?;
        Ok(())
    }

    async fn edit_message_keyboard(
        &self,
        chat_id: i64,
        message_id: i64,
        keyboard: &Keyboard,
    ) -> Result<(), ChatError> {
        debug!(chat_id, message_id, "edit_message_keyboard: called");
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "reply_markup": serde_json::to_value(keyboard)?,
        });
        let _: serde_json::Value = self.call("editMessageReplyMarkup", body).await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ChatError> {
        debug!(chat_id, message_id, "delete_message: called");
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });
        let _: bool = self.call("deleteMessage", body).await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), ChatError> {
        debug!(callback_id, alert, "answer_callback: called");
        let mut body = serde_json::json!({
            "callback_query_id": callback_id,
        });
        if let Some(text) = text {
            body["text"] = serde_json::json!(text);
        }
        if alert {
            body["show_alert"] = serde_json::json!(true);
        }
        let _: bool = self.call("answerCallbackQuery", body).await?;
        Ok(())
    }

    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChatError> {
        debug!(offset, timeout_secs, "get_updates: called");
        let body = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        self.call("getUpdates", body).await
    }

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChatError> {
        debug!(count = commands.len(), "set_commands: called");
        let body = serde_json::json!({
            "commands": commands,
        });
        let _: bool = self.call("setMyCommands", body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> TelegramApi {
        TelegramApi {
            token: "123:abc".to_string(),
            base_url: "https://api.telegram.org".to_string(),
            http: Client::new(),
        }
    }

    #[test]
    fn test_retryable_status_codes() {
        assert!(is_retryable_status(408));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(502));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(504));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(403));
        assert!(!is_retryable_status(429));
        assert!(!is_retryable_status(200));
    }

    #[test]
    fn test_method_url() {
        let client = test_client();
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_envelope_decodes_success() {
        let json = r#"{"ok": true, "result": [1, 2, 3]}"#;
        let envelope: ApiEnvelope<Vec<i64>> = serde_json::from_str(json).unwrap();
        assert!(envelope.ok);
        assert_eq!(envelope.result, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_envelope_decodes_rate_limit_error() {
        let json = r#"{
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 7",
            "parameters": {"retry_after": 7}
        }"#;
        let envelope: ApiEnvelope<bool> = serde_json::from_str(json).unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.error_code, Some(429));
        assert_eq!(envelope.parameters.unwrap().retry_after, Some(7));
    }

    #[test]
    fn test_envelope_decodes_plain_error() {
        let json = r#"{"ok": false, "error_code": 400, "description": "Bad Request: message is not modified"}"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.error_code, Some(400));
        assert!(envelope.result.is_none());
    }
}
