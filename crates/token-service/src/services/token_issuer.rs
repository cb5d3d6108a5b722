//! RTC access token issuance.
//!
//! Every variant builds a [`TokenContent`], signs its canonical payload with
//! HMAC-SHA256 keyed by the application certificate, and returns
//! `base64(signature ++ payload)`. Issuance is a pure function of the inputs
//! and one clock read; nothing is stored.
//!
//! There is no fallback mode. Invalid input is an error, never an unsigned
//! or placeholder token.

use crate::clock::{Clock, SystemClock};
use crate::crypto;
use crate::errors::TokenServiceError;
use crate::observability::hash_for_correlation;
use common::rtc_token::{encode_token, TokenContent, TOKEN_VERSION};
use common::secret::{ExposeSecret, SecretString};
use common::types::{Privilege, Role};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Per-privilege lifetimes for [`TokenIssuer::issue_with_explicit_privileges`].
///
/// Each value is seconds from issuance. Zero or negative values produce a
/// privilege that is already expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeExpireSeconds {
    pub join_channel: i64,
    pub publish_audio: i64,
    pub publish_video: i64,
    pub publish_data_stream: i64,
}

impl PrivilegeExpireSeconds {
    /// The same lifetime for all four privileges.
    pub fn uniform(seconds: i64) -> Self {
        Self {
            join_channel: seconds,
            publish_audio: seconds,
            publish_video: seconds,
            publish_data_stream: seconds,
        }
    }

    fn for_privilege(&self, privilege: Privilege) -> i64 {
        match privilege {
            Privilege::JoinChannel => self.join_channel,
            Privilege::PublishAudio => self.publish_audio,
            Privilege::PublishVideo => self.publish_video,
            Privilege::PublishDataStream => self.publish_data_stream,
        }
    }
}

/// Issues signed tokens for one application identity.
///
/// Cheap to share behind an `Arc`; all methods take `&self` and hold no
/// mutable state.
pub struct TokenIssuer {
    app_id: String,
    app_certificate: SecretString,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer reading the system clock.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the app id or certificate is empty.
    pub fn new(
        app_id: impl Into<String>,
        app_certificate: SecretString,
    ) -> Result<Self, TokenServiceError> {
        Self::with_clock(app_id, app_certificate, Arc::new(SystemClock))
    }

    /// Create an issuer with an explicit time source.
    pub fn with_clock(
        app_id: impl Into<String>,
        app_certificate: SecretString,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenServiceError> {
        let app_id = app_id.into();
        require_non_empty("app id", &app_id)?;
        require_non_empty("app certificate", app_certificate.expose_secret())?;

        Ok(Self {
            app_id,
            app_certificate,
            clock,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Issue a role-based token for a numeric uid.
    ///
    /// All four privileges expire at `now + privilege_expire_seconds`,
    /// whatever the role.
    pub fn issue_with_uid_and_role(
        &self,
        channel: &str,
        uid: u32,
        role: Role,
        token_expire_seconds: i64,
        privilege_expire_seconds: i64,
    ) -> Result<String, TokenServiceError> {
        self.issue_with_user_account(
            channel,
            &uid.to_string(),
            role,
            token_expire_seconds,
            privilege_expire_seconds,
        )
    }

    /// Same as [`Self::issue_with_uid_and_role`].
    pub fn issue_with_uid(
        &self,
        channel: &str,
        uid: u32,
        role: Role,
        token_expire_seconds: i64,
        privilege_expire_seconds: i64,
    ) -> Result<String, TokenServiceError> {
        self.issue_with_uid_and_role(
            channel,
            uid,
            role,
            token_expire_seconds,
            privilege_expire_seconds,
        )
    }

    /// Issue a role-based token for an account string.
    #[instrument(
        name = "token.issue_role",
        skip_all,
        fields(role = %role, channel_hash = %hash_for_correlation(channel))
    )]
    pub fn issue_with_user_account(
        &self,
        channel: &str,
        account: &str,
        role: Role,
        token_expire_seconds: i64,
        privilege_expire_seconds: i64,
    ) -> Result<String, TokenServiceError> {
        require_non_empty("channel", channel)?;
        require_non_empty("account", account)?;

        let now = self.clock.now_unix();
        let privileges = Privilege::ALL
            .iter()
            .map(|p| (*p, now.saturating_add(privilege_expire_seconds)))
            .collect();

        self.sign(TokenContent {
            issuer: self.app_id.clone(),
            expires_at: now.saturating_add(token_expire_seconds),
            version: TOKEN_VERSION,
            channel: channel.to_string(),
            subject: account.to_string(),
            role: Some(role),
            privileges,
        })
    }

    /// Issue a token with an independent lifetime per privilege and no role.
    #[instrument(
        name = "token.issue_privileges",
        skip_all,
        fields(channel_hash = %hash_for_correlation(channel))
    )]
    pub fn issue_with_explicit_privileges(
        &self,
        channel: &str,
        uid: u32,
        token_expire_seconds: i64,
        privilege_expire_seconds: PrivilegeExpireSeconds,
    ) -> Result<String, TokenServiceError> {
        require_non_empty("channel", channel)?;

        let now = self.clock.now_unix();
        let privileges: BTreeMap<Privilege, i64> = Privilege::ALL
            .iter()
            .map(|p| {
                (
                    *p,
                    now.saturating_add(privilege_expire_seconds.for_privilege(*p)),
                )
            })
            .collect();

        self.sign(TokenContent {
            issuer: self.app_id.clone(),
            expires_at: now.saturating_add(token_expire_seconds),
            version: TOKEN_VERSION,
            channel: channel.to_string(),
            subject: uid.to_string(),
            role: None,
            privileges,
        })
    }

    fn sign(&self, content: TokenContent) -> Result<String, TokenServiceError> {
        let payload = content
            .to_payload()
            .map_err(|e| TokenServiceError::Crypto(format!("Payload serialization failed: {}", e)))?;

        let signature =
            crypto::sign_payload(&payload, self.app_certificate.expose_secret().as_bytes())?;

        tracing::debug!(
            target: "token.issuer",
            expires_at = content.expires_at,
            subject_hash = %hash_for_correlation(&content.subject),
            "Token issued"
        );

        Ok(encode_token(&signature, &payload))
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<(), TokenServiceError> {
    if value.is_empty() {
        return Err(TokenServiceError::InvalidArgument(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(())
}
