//! # Token Test Utilities
//!
//! Shared test utilities for the token service.
//!
//! This crate provides:
//! - Fixed credentials and a fixed instant for reproducible tokens
//! - Request body builders (`TokenRequestBuilder`)
//! - Server test harness (`TestTokenServer` for E2E tests)
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use token_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestTokenServer::spawn().await?;
//!
//!     let body = TokenRequestBuilder::new()
//!         .channel(TEST_CHANNEL)
//!         .uid(TEST_UID)
//!         .role("publisher")
//!         .build();
//!
//!     // ... POST body to server.url() ...
//!
//!     token
//!         .assert_well_formed()
//!         .assert_signed_with(TEST_APP_CERTIFICATE)
//!         .assert_for_channel(TEST_CHANNEL);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod request_builders;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use request_builders::*;
pub use server_harness::*;
