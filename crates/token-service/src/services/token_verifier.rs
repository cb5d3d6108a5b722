//! RTC access token verification.
//!
//! The media provider is the production verifier; this is the same check
//! done locally so the service and its tests can prove what a token grants.

use crate::clock::{Clock, SystemClock};
use crate::crypto;
use crate::errors::TokenServiceError;
use crate::observability::metrics;
use common::rtc_token::{split_token, TokenContent, TokenValidationError, TOKEN_VERSION};
use common::secret::{ExposeSecret, SecretString};
use common::types::Privilege;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Verifies tokens issued for one application identity.
pub struct TokenVerifier {
    app_id: String,
    app_certificate: SecretString,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        app_id: impl Into<String>,
        app_certificate: SecretString,
    ) -> Result<Self, TokenServiceError> {
        Self::with_clock(app_id, app_certificate, Arc::new(SystemClock))
    }

    pub fn with_clock(
        app_id: impl Into<String>,
        app_certificate: SecretString,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenServiceError> {
        let app_id = app_id.into();
        if app_id.is_empty() || app_certificate.expose_secret().is_empty() {
            return Err(TokenServiceError::InvalidArgument(
                "app id and app certificate must not be empty".to_string(),
            ));
        }

        Ok(Self {
            app_id,
            app_certificate,
            clock,
        })
    }

    /// Verify a token for a channel and participant.
    ///
    /// Checks, in order: size, framing, signature, version, issuer, token
    /// expiry, channel, subject, and finally `privilege` when one is given.
    ///
    /// # Errors
    ///
    /// Any [`TokenValidationError`]. All variants display the same message.
    #[instrument(name = "token.verify", skip_all)]
    pub fn verify(
        &self,
        token: &str,
        channel: &str,
        subject: &str,
        privilege: Option<Privilege>,
    ) -> Result<TokenContent, TokenValidationError> {
        let result = self.check(token, channel, subject, privilege);

        match &result {
            Ok(_) => metrics::record_token_validation("success", None),
            Err(e) => {
                tracing::debug!(target: "token.verifier", reason = e.reason(), "Token rejected");
                metrics::record_token_validation("error", Some(e.reason()));
            }
        }

        result
    }

    fn check(
        &self,
        token: &str,
        channel: &str,
        subject: &str,
        privilege: Option<Privilege>,
    ) -> Result<TokenContent, TokenValidationError> {
        let parts = split_token(token)?;

        // Signature is checked over the raw bytes before anything is parsed
        crypto::verify_signature(
            &parts.payload,
            &parts.signature_hex,
            self.app_certificate.expose_secret().as_bytes(),
        )?;

        let content = TokenContent::from_payload(&parts.payload)?;

        if content.version != TOKEN_VERSION {
            return Err(TokenValidationError::UnsupportedVersion(content.version));
        }
        if content.issuer != self.app_id {
            return Err(TokenValidationError::IssuerMismatch);
        }

        let now = self.clock.now_unix();
        if content.expires_at <= now {
            return Err(TokenValidationError::Expired);
        }
        if content.channel != channel {
            return Err(TokenValidationError::ChannelMismatch);
        }
        if content.subject != subject {
            return Err(TokenValidationError::SubjectMismatch);
        }

        if let Some(privilege) = privilege {
            match content.privilege_expiry(privilege) {
                None => return Err(TokenValidationError::PrivilegeNotGranted(privilege)),
                Some(expires_at) if expires_at <= now => {
                    return Err(TokenValidationError::PrivilegeExpired(privilege))
                }
                Some(_) => {}
            }
        }

        Ok(content)
    }
}
