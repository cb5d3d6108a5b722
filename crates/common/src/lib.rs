//! Common utilities and types shared across ChatChill backend components.

#![warn(clippy::pedantic)]

/// Module for role and privilege types carried inside access tokens
pub mod types;

/// Module for common configuration
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for the RTC access token wire format (framing, size limits, decoding)
pub mod rtc_token;
