//! Fixed credentials, identities and instants for reproducible tests.

use common::secret::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use token_service::clock::FixedClock;
use token_service::config::Config;
use token_service::services::{TokenIssuer, TokenVerifier};

pub const TEST_APP_ID: &str = "app1";
pub const TEST_APP_CERTIFICATE: &str = "secret";
pub const TEST_CHANNEL: &str = "room42";
pub const TEST_UID: u32 = 1001;
pub const TEST_CHAT_APP_KEY: &str = "chatchill-test";

/// 2023-11-14T22:13:20Z
pub const TEST_NOW: i64 = 1_700_000_000;

/// Environment a test server is configured from.
pub fn test_env_vars() -> HashMap<String, String> {
    HashMap::from([
        ("RTC_APP_ID".to_string(), TEST_APP_ID.to_string()),
        (
            "RTC_APP_CERTIFICATE".to_string(),
            TEST_APP_CERTIFICATE.to_string(),
        ),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("CHAT_APP_KEY".to_string(), TEST_CHAT_APP_KEY.to_string()),
    ])
}

/// Service configuration built from [`test_env_vars`].
pub fn test_config() -> Config {
    Config::from_vars(&test_env_vars()).expect("test config should load")
}

/// A clock frozen at [`TEST_NOW`].
pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(TEST_NOW))
}

/// Issuer for the test app reading `clock`.
pub fn test_issuer(clock: Arc<FixedClock>) -> TokenIssuer {
    TokenIssuer::with_clock(
        TEST_APP_ID,
        SecretString::from(TEST_APP_CERTIFICATE),
        clock,
    )
    .expect("test issuer should build")
}

/// Verifier for the test app reading `clock`.
pub fn test_verifier(clock: Arc<FixedClock>) -> TokenVerifier {
    TokenVerifier::with_clock(
        TEST_APP_ID,
        SecretString::from(TEST_APP_CERTIFICATE),
        clock,
    )
    .expect("test verifier should build")
}
