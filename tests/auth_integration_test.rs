mod common;

use axum::http::StatusCode;
use common::TestApp;
use estacion_api::entities::user::UserRole;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_and_identity() {
    let app = TestApp::new().await;
    app.seed_user("maria", "clave-segura-123", UserRole::Admin)
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"nombre": "maria", "password": "clave-segura-123"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["nombre"], "maria");
    assert_eq!(body["data"]["rol"], "admin");
    assert!(body["data"]["token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    app.seed_user("maria", "clave-segura-123", UserRole::Employee)
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"nombre": "maria", "password": "otra-clave"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_with_unknown_user_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"nombre": "nadie", "password": "clave-segura-123"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_with_missing_fields_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"nombre": "maria"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_for_deactivated_user_is_rejected() {
    let app = TestApp::new().await;
    let user_id = app
        .seed_user("maria", "clave-segura-123", UserRole::Employee)
        .await;
    app.state
        .services
        .users
        .soft_delete(user_id)
        .await
        .unwrap();

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"nombre": "maria", "password": "clave-segura-123"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_round_trips_token_identity() {
    let app = TestApp::new().await;
    app.seed_user("maria", "clave-segura-123", UserRole::Admin)
        .await;
    let token = app.login("maria", "clave-segura-123").await;

    let (status, body) = app.request("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "maria");
    assert_eq!(body["data"]["apellido"], "delturno");
    assert_eq!(body["data"]["rol"], "admin");
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/api/products", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request("GET", "/api/products", Some("not-a-real-token"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_deactivated_user_stops_working() {
    let app = TestApp::new().await;
    let user_id = app
        .seed_user("maria", "clave-segura-123", UserRole::Employee)
        .await;
    let token = app.login("maria", "clave-segura-123").await;

    app.state
        .services
        .users
        .soft_delete(user_id)
        .await
        .unwrap();

    let (status, body) = app
        .request("GET", "/api/products", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn unknown_route_returns_envelope_404() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/api/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
