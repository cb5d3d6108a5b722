use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::types::UnknownValue;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenServiceError {
    /// A required identity, channel, secret or account is empty, or a role
    /// is outside the defined set. Raised before any hashing.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl TokenServiceError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    fn status(&self) -> StatusCode {
        match self {
            TokenServiceError::InvalidArgument(_) | TokenServiceError::MissingParameters => {
                StatusCode::BAD_REQUEST
            }
            TokenServiceError::Crypto(_) | TokenServiceError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<UnknownValue> for TokenServiceError {
    fn from(err: UnknownValue) -> Self {
        TokenServiceError::InvalidArgument(err.to_string())
    }
}

// Extractor rejections are answered with the same `{"error"}` body as
// every other client error.
impl From<JsonRejection> for TokenServiceError {
    fn from(rejection: JsonRejection) -> Self {
        TokenServiceError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for TokenServiceError {
    fn from(rejection: QueryRejection) -> Self {
        TokenServiceError::InvalidArgument(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for TokenServiceError {
    fn into_response(self) -> Response {
        let message = match &self {
            TokenServiceError::InvalidArgument(reason) => reason.clone(),
            TokenServiceError::MissingParameters => "Missing required parameters".to_string(),
            // Internal details stay in the logs
            TokenServiceError::Crypto(_) | TokenServiceError::Internal => {
                "Failed to generate token".to_string()
            }
        };

        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}
