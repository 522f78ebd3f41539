//! Chat API trait definition

use async_trait::async_trait;

use super::error::ChatError;
use super::types::{BotCommand, Keyboard, Message, Update};

/// Transport-agnostic chat surface
///
/// Everything the flows need from the Bot API, narrow enough to mock.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post a new message, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<Message, ChatError>;

    /// Replace the text (and keyboard) of an existing message
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError>;

    /// Replace only the keyboard of an existing message
    async fn edit_message_keyboard(
        &self,
        chat_id: i64,
        message_id: i64,
        keyboard: &Keyboard,
    ) -> Result<(), ChatError>;

    /// Remove a message outright
    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ChatError>;

    /// Acknowledge a button tap, optionally with a toast or alert
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), ChatError>;

    /// Long-poll for updates at the given offset
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChatError>;

    /// Register the command menu
    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChatError>;
}
