//! ChatChill RTC token service library.
//!
//! Issues signed access tokens that let web clients join real-time media
//! channels and the messaging service.
//!
//! # Modules
//!
//! - `clock` - Time source used for issuance and verification
//! - `config` - Service configuration
//! - `crypto` - HMAC signing and verification, uid generation
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP middleware
//! - `models` - Request and response bodies
//! - `observability` - Correlation hashing and metrics
//! - `routes` - Router and application state
//! - `services` - Token issuer and verifier

pub mod clock;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
