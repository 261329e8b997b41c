use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn login_returns_token_and_username() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .request_anon("POST", "/api/auth/login", Some(json!({"username": USERNAME, "password": PASSWORD})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], USERNAME);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn wrong_password_gets_401_without_token() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .request_anon("POST", "/api/auth/login", Some(json!({"username": USERNAME, "password": "nope"})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
    assert_eq!(body["error"], "Credenciales inválidas");
}

#[tokio::test]
async fn malformed_login_body_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .request_anon("POST", "/api/auth/login", Some(json!({"username": USERNAME})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn verify_reports_token_validity() {
    let app = TestApp::spawn().await;

    let (status, body) = app.request("GET", "/api/auth/verify", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valid": true}));

    let (status, body) = app.request_anon("GET", "/api/auth/verify", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"valid": false}));

    let (status, body) = app.send("GET", "/api/auth/verify", None, Some("no-es-un-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"valid": false}));
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = TestApp::spawn().await;
    for uri in ["/api/clientes", "/api/pedidos", "/api/pedidos/stats", "/api/empresa"] {
        let (status, body) = app.request_anon("GET", uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert!(body["error"].is_string());
    }

    let (status, _) = app.send("GET", "/api/pedidos", None, Some("token-falso")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::spawn().await;
    let (status, body) = app.request_anon("GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}
