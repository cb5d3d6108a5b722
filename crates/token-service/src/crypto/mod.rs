use crate::errors::TokenServiceError;
use common::rtc_token::TokenValidationError;
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use tracing::instrument;

type HmacSha256 = Hmac<Sha256>;

/// Largest uid handed out when the client does not bring its own.
pub const MAX_GENERATED_UID: u32 = 999_999;

/// Compute the token signature: lowercase hex HMAC-SHA256 of `payload`.
///
/// The key is the raw bytes of the application certificate.
#[instrument(skip_all)]
pub fn sign_payload(payload: &[u8], app_certificate: &[u8]) -> Result<String, TokenServiceError> {
    let mut mac = HmacSha256::new_from_slice(app_certificate)
        .map_err(|e| TokenServiceError::Crypto(format!("HMAC key rejected: {}", e)))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a claimed hex signature against `payload` in constant time.
///
/// The payload is taken as-is; it is never re-serialized.
#[instrument(skip_all)]
pub fn verify_signature(
    payload: &[u8],
    signature_hex: &str,
    app_certificate: &[u8],
) -> Result<(), TokenValidationError> {
    let claimed = hex::decode(signature_hex).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Signature is not valid hex");
        TokenValidationError::MalformedToken
    })?;

    let mut mac = HmacSha256::new_from_slice(app_certificate).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "HMAC key rejected");
        TokenValidationError::SignatureMismatch
    })?;
    mac.update(payload);

    mac.verify_slice(&claimed).map_err(|_| {
        tracing::debug!(target: "crypto", "Token rejected: signature mismatch");
        TokenValidationError::SignatureMismatch
    })
}

/// Generate a random participant uid in `1..=MAX_GENERATED_UID` using CSPRNG.
///
/// Zero is excluded; media providers treat uid 0 as "assign one for me".
pub fn generate_uid() -> Result<u32, TokenServiceError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 4];
    rng.fill(&mut bytes)
        .map_err(|e| TokenServiceError::Crypto(format!("Random uid generation failed: {}", e)))?;

    Ok(u32::from_be_bytes(bytes) % MAX_GENERATED_UID + 1)
}
