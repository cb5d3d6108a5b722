//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the application certificate and
//! any other shared key material. `SecretString` implements `Debug` with
//! redaction, so a struct that derives `Debug` and holds one is safe to log.
//! The value is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct AppCredentials {
//!     app_id: String,
//!     app_certificate: SecretString,
//! }
//!
//! let creds = AppCredentials {
//!     app_id: "app1".to_string(),
//!     app_certificate: SecretString::from("secret"),
//! };
//!
//! // The certificate is redacted here
//! println!("{:?}", creds);
//!
//! // Reading it is explicit
//! let key: &[u8] = creds.app_certificate.expose_secret().as_bytes();
//! ```
//!
//! Use `SecretString` for application certificates, HMAC keys and bearer
//! tokens held in memory. Issued tokens handed back to clients are plain
//! `String`s, but they must never be logged.

pub use secrecy::{ExposeSecret, SecretString};
