//! Messaging token endpoint.

use crate::errors::TokenServiceError;
use crate::handlers::token_handler::{finish, non_empty};
use crate::models::{ChatTokenRequest, ChatTokenResponse};
use crate::routes::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use common::rtc_token::{split_token, TokenContent};
use common::types::Role;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handle `POST /api/chat-token`.
///
/// The username becomes the token subject and the configured chat app key
/// the channel. Token and privileges share the chat lifetime.
#[instrument(name = "token.http.chat", skip_all, fields(variant = "chat", status))]
pub async fn post_chat_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatTokenRequest>, JsonRejection>,
) -> Result<Json<ChatTokenResponse>, TokenServiceError> {
    let start = Instant::now();

    let result = payload
        .map_err(TokenServiceError::from)
        .and_then(|Json(request)| issue_chat_token(&state, &request));

    finish("chat", "post_chat_token", start, result.map(Json))
}

fn issue_chat_token(
    state: &AppState,
    request: &ChatTokenRequest,
) -> Result<ChatTokenResponse, TokenServiceError> {
    let username =
        non_empty(request.username.as_deref()).ok_or(TokenServiceError::MissingParameters)?;
    let lifetime = state.config.chat_token_expire_seconds;

    let access_token = state.issuer.issue_with_user_account(
        &state.config.chat_app_key,
        username,
        Role::Publisher,
        lifetime,
        lifetime,
    )?;

    // Read back the expiry the issuer actually wrote
    let expire_timestamp = split_token(&access_token)
        .and_then(|parts| TokenContent::from_payload(&parts.payload))
        .map(|content| content.expires_at)
        .map_err(|_| TokenServiceError::Internal)?;

    Ok(ChatTokenResponse {
        access_token,
        expire_timestamp,
    })
}
