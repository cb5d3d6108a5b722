//! Media token endpoints.
//!
//! `GET /api/token` serves the web client's join flow; `POST /api/token`
//! accepts a JSON body and can request explicit per-privilege lifetimes.

use crate::crypto;
use crate::errors::TokenServiceError;
use crate::models::{RequestedUid, TokenQuery, TokenRequest, TokenResponse};
use crate::observability::metrics::{record_error, record_token_issuance};
use crate::observability::ErrorCategory;
use crate::routes::AppState;
use crate::services::PrivilegeExpireSeconds;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use common::types::Role;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handle `GET /api/token?channelName=&uid=&role=`.
///
/// `uid` is generated when absent and `role` defaults to publisher. The uid
/// is echoed back so the client joins with the identity the token names.
#[instrument(
    name = "token.http.get",
    skip_all,
    fields(variant = "uid_role", status)
)]
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let start = Instant::now();

    let result = query
        .map_err(TokenServiceError::from)
        .and_then(|Query(query)| issue_from_query(&state, &query));

    finish("uid_role", "get_token", start, result.map(Json))
}

/// Handle `POST /api/token`.
#[instrument(name = "token.http.post", skip_all, fields(variant, status))]
pub async fn post_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let start = Instant::now();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::Span::current().record("variant", "invalid_body");
            return finish("invalid_body", "post_token", start, Err(rejection.into()));
        }
    };

    let variant = if request.privileges.is_some() {
        "explicit_privileges"
    } else if requested_account(&request).is_some() {
        "user_account"
    } else {
        "uid_role"
    };
    tracing::Span::current().record("variant", variant);

    let result = issue_from_request(&state, &request);

    finish(variant, "post_token", start, result.map(Json))
}

fn issue_from_query(
    state: &AppState,
    query: &TokenQuery,
) -> Result<TokenResponse, TokenServiceError> {
    let channel =
        non_empty(query.channel_name.as_deref()).ok_or(TokenServiceError::MissingParameters)?;

    let uid = match non_empty(query.uid.as_deref()) {
        Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
            TokenServiceError::InvalidArgument("uid must be an unsigned integer".to_string())
        })?,
        None => crypto::generate_uid()?,
    };

    let role = match non_empty(query.role.as_deref()) {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::Publisher,
    };

    let token = state.issuer.issue_with_uid_and_role(
        channel,
        uid,
        role,
        state.config.token_expire_seconds,
        state.config.privilege_expire_seconds,
    )?;

    Ok(TokenResponse {
        token,
        uid: Some(uid),
    })
}

fn issue_from_request(
    state: &AppState,
    request: &TokenRequest,
) -> Result<TokenResponse, TokenServiceError> {
    let channel =
        non_empty(request.channel_name.as_deref()).ok_or(TokenServiceError::MissingParameters)?;
    let config = &state.config;

    if let Some(privileges) = request.privileges {
        let uid = match &request.uid {
            Some(requested) => requested.as_uid().ok_or_else(|| {
                TokenServiceError::InvalidArgument("uid must be an unsigned integer".to_string())
            })?,
            None => crypto::generate_uid()?,
        };
        let token = state.issuer.issue_with_explicit_privileges(
            channel,
            uid,
            config.token_expire_seconds,
            PrivilegeExpireSeconds {
                join_channel: privileges.join,
                publish_audio: privileges.publish_audio,
                publish_video: privileges.publish_video,
                publish_data_stream: privileges.publish_data,
            },
        )?;
        return Ok(TokenResponse {
            token,
            uid: Some(uid),
        });
    }

    let role = non_empty(request.role.as_deref())
        .ok_or(TokenServiceError::MissingParameters)?
        .parse::<Role>()?;

    let uid = request.uid.as_ref().and_then(RequestedUid::as_uid);
    match (uid, requested_account(request)) {
        (None, Some(account)) => {
            let token = state.issuer.issue_with_user_account(
                channel,
                account,
                role,
                config.token_expire_seconds,
                config.privilege_expire_seconds,
            )?;
            Ok(TokenResponse { token, uid: None })
        }
        (uid, _) => {
            let uid = match uid {
                Some(uid) => uid,
                None => crypto::generate_uid()?,
            };
            let token = state.issuer.issue_with_uid(
                channel,
                uid,
                role,
                config.token_expire_seconds,
                config.privilege_expire_seconds,
            )?;
            Ok(TokenResponse {
                token,
                uid: Some(uid),
            })
        }
    }
}

/// Account subject of a `POST /api/token` body: a non-numeric `userId`, else
/// `userName`. `None` when a numeric uid was given.
fn requested_account(request: &TokenRequest) -> Option<&str> {
    match &request.uid {
        Some(requested) if requested.as_uid().is_some() => None,
        Some(requested) => requested
            .as_account()
            .or_else(|| non_empty(request.user_name.as_deref())),
        None => non_empty(request.user_name.as_deref()),
    }
}

/// Record the outcome of an issuance request on the span and in metrics.
pub(crate) fn finish<T>(
    variant: &str,
    operation: &str,
    start: Instant,
    result: Result<T, TokenServiceError>,
) -> Result<T, TokenServiceError> {
    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(variant, status, start.elapsed());

    result.map_err(|e| {
        let category = ErrorCategory::from(&e);
        match category {
            ErrorCategory::Internal => {
                tracing::error!(target: "token.http", error = %e, "Token issuance failed")
            }
            _ => tracing::debug!(target: "token.http", error = %e, "Token request rejected"),
        }
        record_error(operation, category.as_str(), e.status_code());
        e
    })
}

/// `Some(value)` if present and not blank.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
