//! RTC access token wire format shared by the issuer and any verifier.
//!
//! A token is `base64(signature ++ payload)` where:
//! - `signature` is the 64-character lowercase hex HMAC-SHA-256 of `payload`
//! - `payload` is the compact JSON form of [`TokenContent`]
//!
//! There is no delimiter. The fixed signature length marks the boundary.
//!
//! This module owns framing only: serializing content, joining and splitting
//! the blob, and size limits. Keyed hashing lives with the service that holds
//! the application certificate.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE base64 decoding
//! - The payload is never re-serialized for verification; the signature is
//!   checked over the raw bytes that follow it
//! - Validation errors share one generic message; the cause is logged at
//!   debug level

use crate::types::{Privilege, Role};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Current token content format version.
pub const TOKEN_VERSION: u8 = 1;

/// Length of the hex-encoded HMAC-SHA-256 signature prefix.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Maximum accepted token length in bytes (4KB), checked before decoding.
///
/// A typical token is 300-400 characters. Anything near this size is not
/// something the issuer produces.
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096;

// =============================================================================
// Error Types
// =============================================================================

/// Reasons a token is rejected.
///
/// Display messages are intentionally identical so that callers cannot learn
/// which check failed. Use the variant for metrics and debug logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    /// Token length exceeds [`MAX_TOKEN_SIZE_BYTES`].
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Not base64, too short, non-hex signature, or payload not parseable.
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Recomputed HMAC does not match the embedded signature.
    #[error("The access token is invalid or expired")]
    SignatureMismatch,

    /// `v` is not [`TOKEN_VERSION`].
    #[error("The access token is invalid or expired")]
    UnsupportedVersion(u8),

    /// Token was issued for a different application.
    #[error("The access token is invalid or expired")]
    IssuerMismatch,

    /// `exp` is at or before the verifier's current time.
    #[error("The access token is invalid or expired")]
    Expired,

    /// Token is scoped to another channel.
    #[error("The access token is invalid or expired")]
    ChannelMismatch,

    /// Token is scoped to another participant.
    #[error("The access token is invalid or expired")]
    SubjectMismatch,

    /// Requested privilege is absent from the token.
    #[error("The access token is invalid or expired")]
    PrivilegeNotGranted(Privilege),

    /// Requested privilege expiry is at or before the current time.
    #[error("The access token is invalid or expired")]
    PrivilegeExpired(Privilege),
}

impl TokenValidationError {
    /// Bounded label for metrics.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            TokenValidationError::TokenTooLarge => "too_large",
            TokenValidationError::MalformedToken => "malformed",
            TokenValidationError::SignatureMismatch => "signature",
            TokenValidationError::UnsupportedVersion(_) => "version",
            TokenValidationError::IssuerMismatch => "issuer",
            TokenValidationError::Expired => "expired",
            TokenValidationError::ChannelMismatch => "channel",
            TokenValidationError::SubjectMismatch => "subject",
            TokenValidationError::PrivilegeNotGranted(_) => "privilege_not_granted",
            TokenValidationError::PrivilegeExpired(_) => "privilege_expired",
        }
    }
}

// =============================================================================
// Content
// =============================================================================

/// The signed token payload.
///
/// Field order is the serialization order and must not change: signatures
/// are computed over the exact bytes produced by [`TokenContent::to_payload`].
///
/// The `subject` field is redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenContent {
    /// Application identity that issued the token.
    #[serde(rename = "iss")]
    pub issuer: String,

    /// Absolute token expiry (Unix epoch seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Format version, always [`TOKEN_VERSION`] when issued.
    #[serde(rename = "v")]
    pub version: u8,

    /// Channel the bearer may join.
    pub channel: String,

    /// Participant the token is scoped to (decimal uid or account string).
    #[serde(rename = "uid")]
    pub subject: String,

    /// Present on role-based tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Per-privilege absolute expiry (Unix epoch seconds).
    pub privileges: BTreeMap<Privilege, i64>,
}

impl fmt::Debug for TokenContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenContent")
            .field("issuer", &self.issuer)
            .field("expires_at", &self.expires_at)
            .field("version", &self.version)
            .field("channel", &self.channel)
            .field("subject", &"[REDACTED]")
            .field("role", &self.role)
            .field("privileges", &self.privileges)
            .finish()
    }
}

impl TokenContent {
    /// Serialize to the canonical payload bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error. With the field types used
    /// here this does not happen in practice.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parse payload bytes recovered from a token.
    ///
    /// # Errors
    ///
    /// Returns `MalformedToken` if the bytes are not a valid content object.
    pub fn from_payload(payload: &[u8]) -> Result<Self, TokenValidationError> {
        serde_json::from_slice(payload).map_err(|e| {
            tracing::debug!(target: "common.rtc_token", error = %e, "Failed to parse token payload");
            TokenValidationError::MalformedToken
        })
    }

    /// Expiry of a single privilege, if granted.
    #[must_use]
    pub fn privilege_expiry(&self, privilege: Privilege) -> Option<i64> {
        self.privileges.get(&privilege).copied()
    }
}

// =============================================================================
// Framing
// =============================================================================

/// A token split into its signature and raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParts {
    /// Claimed signature, 64 lowercase hex characters.
    pub signature_hex: String,
    /// Payload bytes exactly as embedded.
    pub payload: Vec<u8>,
}

/// Join a hex signature and payload into the token string.
#[must_use]
pub fn encode_token(signature_hex: &str, payload: &[u8]) -> String {
    let mut blob = Vec::with_capacity(signature_hex.len() + payload.len());
    blob.extend_from_slice(signature_hex.as_bytes());
    blob.extend_from_slice(payload);
    STANDARD.encode(blob)
}

/// Decode a token and split off the fixed-length signature prefix.
///
/// Does NOT verify the signature.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds [`MAX_TOKEN_SIZE_BYTES`]
/// - `MalformedToken` - bad base64, blob shorter than the signature, or a
///   signature prefix that is not lowercase hex
pub fn split_token(token: &str) -> Result<SignedParts, TokenValidationError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "common.rtc_token",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(TokenValidationError::TokenTooLarge);
    }

    let blob = STANDARD.decode(token.trim()).map_err(|e| {
        tracing::debug!(target: "common.rtc_token", error = %e, "Failed to decode token base64");
        TokenValidationError::MalformedToken
    })?;

    let signature = blob
        .get(..SIGNATURE_HEX_LEN)
        .ok_or(TokenValidationError::MalformedToken)?;
    let payload = blob
        .get(SIGNATURE_HEX_LEN..)
        .ok_or(TokenValidationError::MalformedToken)?;

    // Issuance only writes lowercase, so each payload has exactly one valid token
    if !signature
        .iter()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        tracing::debug!(
            target: "common.rtc_token",
            "Token rejected: signature prefix is not lowercase hex"
        );
        return Err(TokenValidationError::MalformedToken);
    }

    let signature_hex =
        String::from_utf8(signature.to_vec()).map_err(|_| TokenValidationError::MalformedToken)?;

    Ok(SignedParts {
        signature_hex,
        payload: payload.to_vec(),
    })
}
