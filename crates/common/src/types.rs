//! Role and privilege types carried inside RTC access tokens.
//!
//! Both enums serialize as their numeric wire value (`1`, `2`, ...), which is
//! what the media provider expects. Privileges are also used as map keys in
//! the token payload, where `serde_json` renders them as `"1"`, `"2"`, ...

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A numeric or textual value that does not name a known role or privilege.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownValue {
    /// Role value outside `{1, 2}` or an unrecognized role name.
    #[error("unknown role: {0}")]
    Role(String),

    /// Privilege id outside `{1, 2, 3, 4}`.
    #[error("unknown privilege: {0}")]
    Privilege(u8),
}

/// Coarse capability grant recorded in role-based tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    /// May join and publish audio, video and data.
    Publisher,
    /// Joins to receive remote streams.
    Subscriber,
}

impl Role {
    /// Numeric wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Role::Publisher => 1,
            Role::Subscriber => 2,
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Publisher => "publisher",
            Role::Subscriber => "subscriber",
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role.as_u8()
    }
}

impl TryFrom<u8> for Role {
    type Error = UnknownValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Publisher),
            2 => Ok(Role::Subscriber),
            other => Err(UnknownValue::Role(other.to_string())),
        }
    }
}

/// Parses the names the web client sends.
///
/// `host` and `guest` are accepted as aliases for the publisher and
/// subscriber roles. Numeric strings are accepted as wire values.
impl FromStr for Role {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "publisher" | "host" | "1" => Ok(Role::Publisher),
            "subscriber" | "guest" | "2" => Ok(Role::Subscriber),
            _ => Err(UnknownValue::Role(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specific capability with its own expiry inside a token.
///
/// Ordering follows the numeric id so that an ordered map of privileges
/// always serializes in ascending key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Privilege {
    JoinChannel,
    PublishAudio,
    PublishVideo,
    PublishDataStream,
}

impl Privilege {
    /// Every privilege, in wire order.
    pub const ALL: [Privilege; 4] = [
        Privilege::JoinChannel,
        Privilege::PublishAudio,
        Privilege::PublishVideo,
        Privilege::PublishDataStream,
    ];

    /// Numeric wire id.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Privilege::JoinChannel => 1,
            Privilege::PublishAudio => 2,
            Privilege::PublishVideo => 3,
            Privilege::PublishDataStream => 4,
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Privilege::JoinChannel => "join_channel",
            Privilege::PublishAudio => "publish_audio",
            Privilege::PublishVideo => "publish_video",
            Privilege::PublishDataStream => "publish_data_stream",
        }
    }
}

impl From<Privilege> for u8 {
    fn from(privilege: Privilege) -> Self {
        privilege.as_u8()
    }
}

impl TryFrom<u8> for Privilege {
    type Error = UnknownValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Privilege::JoinChannel),
            2 => Ok(Privilege::PublishAudio),
            3 => Ok(Privilege::PublishVideo),
            4 => Ok(Privilege::PublishDataStream),
            other => Err(UnknownValue::Privilege(other)),
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
