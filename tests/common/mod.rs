#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use estacion_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    entities::user::UserRole,
    handlers::AppServices,
    services::users::CreateUserInput,
    AppState,
};

/// Helper harness that spins up the full application router backed by a
/// throwaway SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _tmp: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let db_path = tmp.path().join("estacion_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "8b1f4ce92d7a45e0bb3f6c1a9d8e2f70c4a5b6d7".to_string(),
            3600,
            "127.0.0.1".to_string(),
            15_000,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
        );
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));
        let services = AppServices::new(
            db_arc.clone(),
            auth_service.clone(),
            cfg.fuel_price_per_cubic_meter,
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            auth: auth_service.clone(),
            services,
        };
        let router = estacion_api::build_app(state.clone(), auth_service);

        Self {
            router,
            state,
            _tmp: tmp,
        }
    }

    /// Seed a user directly through the service layer and return its id.
    pub async fn seed_user(&self, nombre: &str, password: &str, rol: UserRole) -> i32 {
        let account = self
            .state
            .services
            .users
            .create(CreateUserInput {
                nombre: nombre.to_string(),
                apellido: "delturno".to_string(),
                password: password.to_string(),
                rol: Some(rol),
            })
            .await
            .expect("failed to seed user");
        account.id
    }

    /// Seed an admin and log in, returning a bearer token.
    pub async fn admin_token(&self) -> String {
        self.seed_user("admin", "clave-segura-123", UserRole::Admin)
            .await;
        self.login("admin", "clave-segura-123").await
    }

    /// Log in through the API and return the issued token.
    pub async fn login(&self, nombre: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"nombre": nombre, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token missing from login response")
            .to_string()
    }

    /// Drive one request through the router and decode the JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .expect("failed to build request"),
            None => builder.body(Body::empty()).expect("failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };
        (status, value)
    }
}
