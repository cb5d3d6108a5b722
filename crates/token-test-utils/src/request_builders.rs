//! Builder patterns for test request bodies
//!
//! Bodies are built as `serde_json::Value` so tests can also send shapes the
//! service must reject.

use serde_json::{json, Map, Value};

/// Builder for `POST /api/token` bodies
///
/// # Example
/// ```rust,ignore
/// let body = TokenRequestBuilder::new()
///     .channel("room42")
///     .uid(1001)
///     .privileges(3600, 60, 60, 0)
///     .build();
/// ```
#[derive(Debug, Default, Clone)]
pub struct TokenRequestBuilder {
    fields: Map<String, Value>,
}

impl TokenRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `channelName`
    pub fn channel(mut self, channel: &str) -> Self {
        self.fields.insert("channelName".into(), json!(channel));
        self
    }

    /// Set `roomId`, the legacy name for the channel
    pub fn room_id(mut self, room_id: &str) -> Self {
        self.fields.insert("roomId".into(), json!(room_id));
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.fields.insert("role".into(), json!(role));
        self
    }

    pub fn uid(mut self, uid: u32) -> Self {
        self.fields.insert("uid".into(), json!(uid));
        self
    }

    /// Set `userId` as a string, as the web client sends it
    pub fn user_id(mut self, user_id: &str) -> Self {
        self.fields.insert("userId".into(), json!(user_id));
        self
    }

    pub fn user_name(mut self, user_name: &str) -> Self {
        self.fields.insert("userName".into(), json!(user_name));
        self
    }

    /// Request explicit per-privilege lifetimes in seconds
    pub fn privileges(mut self, join: i64, audio: i64, video: i64, data: i64) -> Self {
        self.fields.insert(
            "privileges".into(),
            json!({
                "join": join,
                "publishAudio": audio,
                "publishVideo": video,
                "publishData": data,
            }),
        );
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Body of `POST /api/chat-token`
pub fn chat_token_request(username: &str) -> Value {
    json!({ "username": username })
}
