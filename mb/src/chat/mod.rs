//! Telegram chat surface
//!
//! Flow logic talks to the `ChatApi` trait; the `telegram` module is
//! the production implementation and tests swap in a mock.

pub mod api;
pub mod error;
pub mod telegram;
pub mod types;

pub use api::ChatApi;
pub use error::ChatError;
pub use telegram::TelegramApi;
pub use types::{BotCommand, Button, CallbackQuery, Chat, Keyboard, Message, SurfaceKey, Update, User};

/// Escape the Markdown characters Telegram trips over in user names
pub fn escape_markdown(text: &str) -> String {
    text.replace('_', "\\_").replace('*', "\\*")
}
