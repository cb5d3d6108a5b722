//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions over issued RTC tokens.

use common::rtc_token::{split_token, TokenContent, SIGNATURE_HEX_LEN};
use common::types::{Privilege, Role};
use token_service::crypto::verify_signature;

/// Decode a token's content without checking its signature.
pub fn decode_content(token: &str) -> TokenContent {
    let parts = split_token(token)
        .unwrap_or_else(|e| panic!("Token does not split into signature and payload: {e:?}"));
    TokenContent::from_payload(&parts.payload)
        .unwrap_or_else(|e| panic!("Token payload is not valid content: {e:?}"))
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_well_formed()
///     .assert_signed_with("secret")
///     .assert_for_channel("room42")
///     .assert_for_subject("1001");
/// ```
pub trait TokenAssertions {
    /// Assert base64 framing, a 64-char lowercase hex prefix and parseable content
    fn assert_well_formed(&self) -> &Self;

    /// Assert the signature verifies under `app_certificate`
    fn assert_signed_with(&self, app_certificate: &str) -> &Self;

    /// Assert the token was issued by `app_id`
    fn assert_issued_by(&self, app_id: &str) -> &Self;

    fn assert_for_channel(&self, channel: &str) -> &Self;

    fn assert_for_subject(&self, subject: &str) -> &Self;

    fn assert_role(&self, role: Role) -> &Self;

    /// Assert the token carries no role field (explicit-privileges tokens)
    fn assert_has_no_role(&self) -> &Self;

    /// Assert the absolute token expiry
    fn assert_expires_at(&self, expires_at: i64) -> &Self;

    /// Assert the absolute expiry of one privilege
    fn assert_privilege_expires_at(&self, privilege: Privilege, expires_at: i64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_well_formed(&self) -> &Self {
        let parts = split_token(self)
            .unwrap_or_else(|e| panic!("Token is not well formed: {e:?}"));
        assert_eq!(parts.signature_hex.len(), SIGNATURE_HEX_LEN);
        assert!(
            parts
                .signature_hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "Signature prefix must be lowercase hex, got {}",
            parts.signature_hex
        );
        decode_content(self);
        self
    }

    fn assert_signed_with(&self, app_certificate: &str) -> &Self {
        let parts = split_token(self).expect("token should split");
        let result = verify_signature(
            &parts.payload,
            &parts.signature_hex,
            app_certificate.as_bytes(),
        );
        assert!(
            result.is_ok(),
            "Token signature does not verify: {result:?}"
        );
        self
    }

    fn assert_issued_by(&self, app_id: &str) -> &Self {
        assert_eq!(decode_content(self).issuer, app_id, "Unexpected issuer");
        self
    }

    fn assert_for_channel(&self, channel: &str) -> &Self {
        assert_eq!(decode_content(self).channel, channel, "Unexpected channel");
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        assert_eq!(decode_content(self).subject, subject, "Unexpected subject");
        self
    }

    fn assert_role(&self, role: Role) -> &Self {
        assert_eq!(decode_content(self).role, Some(role), "Unexpected role");
        self
    }

    fn assert_has_no_role(&self) -> &Self {
        let role = decode_content(self).role;
        assert!(role.is_none(), "Expected no role, found {role:?}");
        self
    }

    fn assert_expires_at(&self, expires_at: i64) -> &Self {
        assert_eq!(
            decode_content(self).expires_at,
            expires_at,
            "Unexpected token expiry"
        );
        self
    }

    fn assert_privilege_expires_at(&self, privilege: Privilege, expires_at: i64) -> &Self {
        assert_eq!(
            decode_content(self).privilege_expiry(privilege),
            Some(expires_at),
            "Unexpected expiry for {privilege}"
        );
        self
    }
}
