//! # Server Endpoint Tests
//!
//! Integration tests for the static endpoints and request validation.

mod common;

use anyhow::Result;
use common::TestApp;
use serde_json::Value;

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // --- Test Root Endpoint ---
    let root_response = app.get("/").await?;
    assert!(root_response.status().is_success());
    assert_eq!("seocrew server is running.", root_response.text().await?);

    // --- Test Health Check Endpoint ---
    let health_response = app.get("/health").await?;
    assert!(health_response.status().is_success());
    assert_eq!("OK", health_response.text().await?);

    Ok(())
}

#[tokio::test]
async fn test_teste_route_returns_fixed_message() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/teste?tema=ignorado").await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body, serde_json::json!({ "mensagem": "Teste OK" }));
    Ok(())
}

#[tokio::test]
async fn test_clients_endpoint_lists_routes() -> Result<()> {
    let app = TestApp::spawn().await?;

    let body: Value = app.get("/clients").await?.json().await?;

    let clients = body["clients"].as_array().expect("clients array");
    assert_eq!(clients.len(), 11);
    let villa = clients
        .iter()
        .find(|c| c["slug"] == "villa_puppy")
        .expect("villa_puppy listed");
    assert_eq!(
        villa["routes"],
        serde_json::json!(["villa_puppy", "villa_puppy_backlink"])
    );
    let erika = clients.iter().find(|c| c["slug"] == "dra_erika").unwrap();
    assert_eq!(erika["output"], "article");
    Ok(())
}

#[tokio::test]
async fn test_missing_query_parameters_are_rejected() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let chat = app.mock_chat_completion("<p>nunca</p>").await;

    // Act
    let missing_keyword = app.get("/villa_puppy?tema=Banho").await?;
    let missing_both = app.get("/invictus_backlink").await?;

    // Assert
    assert_eq!(missing_keyword.status(), 400);
    assert_eq!(missing_both.status(), 400);
    assert_eq!(chat.hits_async().await, 0, "no generation without parameters");
    Ok(())
}

#[tokio::test]
async fn test_unknown_client_returns_not_found() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // Act
    let response = app.get("/dra_francine?tema=a&palavra_chave=b").await?;

    // Assert
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("dra_francine"));
    Ok(())
}
