use serde::{Deserialize, Serialize};

/// Query string of `GET /api/token`.
///
/// Every field is taken as a string so that missing and malformed values are
/// reported with the service's own error body rather than the extractor's.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(rename = "channelName")]
    pub channel_name: Option<String>,
    pub uid: Option<String>,
    pub role: Option<String>,
}

/// Body of `POST /api/token`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(alias = "roomId")]
    pub channel_name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "userId")]
    pub uid: Option<RequestedUid>,
    /// Account string used as the subject when no uid is given.
    pub user_name: Option<String>,
    /// Per-privilege lifetimes in seconds. Selects the explicit-privileges
    /// variant; `role` is then ignored.
    pub privileges: Option<PrivilegeRequest>,
}

/// Participant id as sent by the client: a JSON number, or a string that
/// is either a decimal uid or an account name such as `user-ab12c`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RequestedUid {
    Numeric(u32),
    Text(String),
}

impl RequestedUid {
    /// The numeric uid, if the value is or parses as one.
    pub fn as_uid(&self) -> Option<u32> {
        match self {
            RequestedUid::Numeric(uid) => Some(*uid),
            RequestedUid::Text(text) => text.trim().parse().ok(),
        }
    }

    /// The account string, if the value is non-blank text that is not a uid.
    pub fn as_account(&self) -> Option<&str> {
        match self {
            RequestedUid::Numeric(_) => None,
            RequestedUid::Text(text) if self.as_uid().is_none() && !text.trim().is_empty() => {
                Some(text.as_str())
            }
            RequestedUid::Text(_) => None,
        }
    }
}

/// Lifetimes in seconds for each privilege of an explicit-privileges token.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegeRequest {
    #[serde(default)]
    pub join: i64,
    #[serde(default)]
    pub publish_audio: i64,
    #[serde(default)]
    pub publish_video: i64,
    #[serde(default)]
    pub publish_data: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    /// The numeric uid the token is scoped to; absent for account tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
}

/// Body of `POST /api/chat-token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatTokenRequest {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTokenResponse {
    pub access_token: String,
    /// Token expiry, Unix epoch seconds.
    pub expire_timestamp: i64,
}
