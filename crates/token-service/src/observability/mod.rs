//! Observability for the token service.
//!
//! # Privacy by Default
//!
//! All instrumentation uses `#[instrument(skip_all)]` and explicit safe field allow-listing.
//! Fields are categorized as:
//! - **SAFE**: Can be logged in plaintext (role, variant, status)
//! - **HASHED**: Logged only as a correlation hash (channel, uid, account)
//! - **NEVER**: Must never appear in logs (app certificate, issued tokens)

pub mod metrics;

use crate::errors::TokenServiceError;
use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for channel names and participant identifiers, which need correlation
/// across log entries but should not be stored in plaintext.
///
/// # Privacy
///
/// This is a one-way hash for correlation purposes only. The truncation to
/// 8 chars is enough to tell requests apart while debugging.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}

/// Error categories for metrics labels (bounded cardinality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid request input
    Validation,
    /// Signing or randomness failure
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&TokenServiceError> for ErrorCategory {
    fn from(err: &TokenServiceError) -> Self {
        match err {
            TokenServiceError::InvalidArgument(_) | TokenServiceError::MissingParameters => {
                ErrorCategory::Validation
            }
            TokenServiceError::Crypto(_) | TokenServiceError::Internal => ErrorCategory::Internal,
        }
    }
}
