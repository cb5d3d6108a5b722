//! Integration tests for the operational endpoints.

use reqwest::StatusCode;
use token_test_utils::TestTokenServer;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Health check should return 200 OK"
    );
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_is_served() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_unknown_path_is_404() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/api/hms-token", server.url())).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
