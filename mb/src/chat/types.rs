//! Wire types for the Bot API surface

use serde::{Deserialize, Serialize};

/// Chat id plus message id, the coordinates of one rendered surface
///
/// Every interactive message (planning board, result slider, stats
/// card) is keyed by this pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey {
    pub chat_id: i64,
    pub message_id: i64,
}

impl SurfaceKey {
    pub fn new(chat_id: i64, message_id: i64) -> Self {
        Self { chat_id, message_id }
    }
}

/// One long-poll update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    pub fn surface_key(&self) -> SurfaceKey {
        SurfaceKey::new(self.chat.id, self.message_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Button tap relayed by the Bot API
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Message the tapped keyboard was attached to; absent for
    /// messages too old for the API to include
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub callback_data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Inline keyboard markup, serialized in Bot API shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    #[serde(rename = "inline_keyboard")]
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }
}

/// Entry for the bot command menu
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message_update() {
        let json = r#"{
            "update_id": 101,
            "message": {
                "message_id": 7,
                "chat": {"id": -100},
                "from": {"id": 42, "first_name": "Alice", "username": "alice"},
                "text": "/plan"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 101);
        let message = update.message.unwrap();
        assert_eq!(message.surface_key(), SurfaceKey::new(-100, 7));
        assert_eq!(message.text.as_deref(), Some("/plan"));
        assert_eq!(message.from.unwrap().username.as_deref(), Some("alice"));
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_decode_callback_update() {
        let json = r#"{
            "update_id": 102,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42, "first_name": "Alice", "username": "alice"},
                "message": {"message_id": 7, "chat": {"id": -100}},
                "data": "rsvp:yes"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let callback = update.callback_query.unwrap();
        assert_eq!(callback.id, "cb-1");
        assert_eq!(callback.data.as_deref(), Some("rsvp:yes"));
        assert_eq!(
            callback.message.unwrap().surface_key(),
            SurfaceKey::new(-100, 7)
        );
    }

    #[test]
    fn test_decode_update_without_username() {
        let json = r#"{
            "update_id": 103,
            "message": {
                "message_id": 8,
                "chat": {"id": -100},
                "from": {"id": 43, "first_name": "NoName"},
                "text": "/record"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let user = update.message.unwrap().from.unwrap();
        assert!(user.username.is_none());
    }

    #[test]
    fn test_keyboard_serializes_in_api_shape() {
        let keyboard = Keyboard::new()
            .row(vec![Button::new("Yes", "rsvp:yes"), Button::new("No", "rsvp:no")])
            .row(vec![Button::new("Cancel", "plan:cancel")]);
        let value = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(value["inline_keyboard"][0][0]["text"], "Yes");
        assert_eq!(value["inline_keyboard"][0][1]["callback_data"], "rsvp:no");
        assert_eq!(value["inline_keyboard"][1].as_array().unwrap().len(), 1);
    }
}
