//! HTTP contract of `/api/chat-token` against a real server.

use common::types::{Privilege, Role};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use token_test_utils::*;

async fn post_chat(server: &TestTokenServer, body: &Value) -> Result<(StatusCode, Value), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/chat-token", server.url()))
        .json(body)
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn test_chat_token_for_username() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = post_chat(&server, &chat_token_request("alice")).await?;

    assert_eq!(status, StatusCode::OK);
    let expected_exp = TEST_NOW + server.config().chat_token_expire_seconds;
    assert_eq!(body["expireTimestamp"], expected_exp);

    let token = body["accessToken"].as_str().expect("token string").to_string();
    token
        .assert_well_formed()
        .assert_signed_with(TEST_APP_CERTIFICATE)
        .assert_for_channel(TEST_CHAT_APP_KEY)
        .assert_for_subject("alice")
        .assert_role(Role::Publisher)
        .assert_expires_at(expected_exp);

    for privilege in Privilege::ALL {
        token.assert_privilege_expires_at(privilege, expected_exp);
    }

    Ok(())
}

#[tokio::test]
async fn test_chat_token_uses_configured_lifetime() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn_with_vars(HashMap::from([(
        "CHAT_TOKEN_EXPIRE_SECONDS".to_string(),
        "600".to_string(),
    )]))
    .await?;

    let (status, body) = post_chat(&server, &chat_token_request("bob")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expireTimestamp"], TEST_NOW + 600);

    Ok(())
}

#[tokio::test]
async fn test_chat_token_requires_username() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    for body in [serde_json::json!({}), chat_token_request("")] {
        let (status, response) = post_chat(&server, &body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing required parameters");
    }

    Ok(())
}
