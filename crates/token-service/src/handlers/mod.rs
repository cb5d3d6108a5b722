//! HTTP request handlers for the token service.

pub mod chat_token_handler;
pub mod health;
pub mod metrics;
pub mod token_handler;

pub use chat_token_handler::post_chat_token;
pub use health::health_check;
pub use metrics::metrics_handler;
pub use token_handler::{get_token, post_token};
