//! HTTP contract of `/api/token` against a real server.

use common::types::{Privilege, Role};
use reqwest::StatusCode;
use serde_json::Value;
use token_test_utils::*;

async fn get_json(url: String) -> Result<(StatusCode, Value), anyhow::Error> {
    let response = reqwest::get(url).await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

async fn post_json(url: String, body: &Value) -> Result<(StatusCode, Value), anyhow::Error> {
    let response = reqwest::Client::new().post(url).json(body).send().await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

// ============================================================================
// GET /api/token
// ============================================================================

#[tokio::test]
async fn test_get_token_with_uid() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = get_json(format!(
        "{}/api/token?channelName={}&uid={}",
        server.url(),
        TEST_CHANNEL,
        TEST_UID
    ))
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], TEST_UID);

    let token = body["token"].as_str().expect("token string").to_string();
    token
        .assert_well_formed()
        .assert_signed_with(TEST_APP_CERTIFICATE)
        .assert_for_channel(TEST_CHANNEL)
        .assert_for_subject("1001")
        .assert_role(Role::Publisher)
        .assert_expires_at(TEST_NOW + server.config().token_expire_seconds);

    Ok(())
}

#[tokio::test]
async fn test_get_token_assigns_uid_when_absent() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) =
        get_json(format!("{}/api/token?channelName=lobby", server.url())).await?;

    assert_eq!(status, StatusCode::OK);
    let uid = body["uid"].as_u64().expect("numeric uid");
    assert!((1..=999_999).contains(&uid));

    let token = body["token"].as_str().expect("token string").to_string();
    token.assert_for_subject(&uid.to_string());

    Ok(())
}

#[tokio::test]
async fn test_get_token_subscriber_role() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = get_json(format!(
        "{}/api/token?channelName={}&uid=7&role=subscriber",
        server.url(),
        TEST_CHANNEL
    ))
    .await?;

    assert_eq!(status, StatusCode::OK);
    body["token"]
        .as_str()
        .expect("token string")
        .to_string()
        .assert_role(Role::Subscriber);

    Ok(())
}

#[tokio::test]
async fn test_get_token_missing_channel() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = get_json(format!("{}/api/token?uid=7", server.url())).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameters");

    Ok(())
}

#[tokio::test]
async fn test_get_token_unknown_role() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = get_json(format!(
        "{}/api/token?channelName={}&role=admin",
        server.url(),
        TEST_CHANNEL
    ))
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown role: admin");

    Ok(())
}

// ============================================================================
// POST /api/token
// ============================================================================

#[tokio::test]
async fn test_post_token_with_room_id_and_host_role() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let body = TokenRequestBuilder::new()
        .room_id(TEST_CHANNEL)
        .role("host")
        .uid(TEST_UID)
        .build();

    let (status, response) = post_json(format!("{}/api/token", server.url()), &body).await?;

    assert_eq!(status, StatusCode::OK);
    response["token"]
        .as_str()
        .expect("token string")
        .to_string()
        .assert_for_channel(TEST_CHANNEL)
        .assert_role(Role::Publisher);

    Ok(())
}

#[tokio::test]
async fn test_post_token_explicit_privileges() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let body = TokenRequestBuilder::new()
        .channel(TEST_CHANNEL)
        .uid(TEST_UID)
        .privileges(3600, 60, 60, 0)
        .build();

    let (status, response) = post_json(format!("{}/api/token", server.url()), &body).await?;

    assert_eq!(status, StatusCode::OK);
    response["token"]
        .as_str()
        .expect("token string")
        .to_string()
        .assert_has_no_role()
        .assert_privilege_expires_at(Privilege::JoinChannel, TEST_NOW + 3600)
        .assert_privilege_expires_at(Privilege::PublishAudio, TEST_NOW + 60)
        .assert_privilege_expires_at(Privilege::PublishDataStream, TEST_NOW);

    Ok(())
}

#[tokio::test]
async fn test_post_token_user_account() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let body = TokenRequestBuilder::new()
        .channel(TEST_CHANNEL)
        .role("guest")
        .user_name("alice")
        .build();

    let (status, response) = post_json(format!("{}/api/token", server.url()), &body).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(response.get("uid").is_none());
    response["token"]
        .as_str()
        .expect("token string")
        .to_string()
        .assert_for_subject("alice")
        .assert_role(Role::Subscriber);

    Ok(())
}

#[tokio::test]
async fn test_post_token_string_user_id_is_account_subject() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let body = TokenRequestBuilder::new()
        .room_id(TEST_CHANNEL)
        .role("host")
        .user_id("user-ab12c")
        .user_name("alice")
        .build();

    let (status, response) = post_json(format!("{}/api/token", server.url()), &body).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(response.get("uid").is_none());
    response["token"]
        .as_str()
        .expect("token string")
        .to_string()
        .assert_signed_with(TEST_APP_CERTIFICATE)
        .assert_for_channel(TEST_CHANNEL)
        .assert_for_subject("user-ab12c")
        .assert_role(Role::Publisher);

    Ok(())
}

#[tokio::test]
async fn test_post_token_truncated_body_is_json_error() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/token", server.url()))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(r#"{"roomId":"room42","role":"host""#)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    Ok(())
}

#[tokio::test]
async fn test_post_token_missing_parameters() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    for body in [
        TokenRequestBuilder::new().role("publisher").build(),
        TokenRequestBuilder::new().channel(TEST_CHANNEL).build(),
        TokenRequestBuilder::new().channel("").role("publisher").build(),
    ] {
        let (status, response) =
            post_json(format!("{}/api/token", server.url()), &body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response["error"], "Missing required parameters");
    }

    Ok(())
}

#[tokio::test]
async fn test_post_token_follows_server_clock() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let body = TokenRequestBuilder::new()
        .channel(TEST_CHANNEL)
        .role("publisher")
        .uid(TEST_UID)
        .build();

    let (_, first) = post_json(format!("{}/api/token", server.url()), &body).await?;
    server.clock().advance(1);
    let (_, second) = post_json(format!("{}/api/token", server.url()), &body).await?;

    assert_ne!(first["token"], second["token"]);
    second["token"]
        .as_str()
        .expect("token string")
        .to_string()
        .assert_expires_at(TEST_NOW + 1 + server.config().token_expire_seconds);

    Ok(())
}
