use super::common::success_response;
use crate::{
    auth::{AuthRouterExt, AuthUser},
    errors::ServiceError,
    handlers::AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Login credentials
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "nombre": "maria",
    "password": "s3guro-y-largo"
}))]
pub struct LoginRequest {
    /// Login name
    #[schema(example = "maria")]
    pub nombre: Option<String>,
    /// Plain-text password, verified against the stored hash
    #[schema(example = "s3guro-y-largo")]
    pub password: Option<String>,
}

/// Successful login payload
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub rol: crate::entities::user::UserRole,
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Authenticate with name and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::errors::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (nombre, password) = match (payload.nombre, payload.password) {
        (Some(nombre), Some(password)) if !nombre.trim().is_empty() && !password.is_empty() => {
            (nombre, password)
        }
        _ => {
            return Err(ServiceError::InvalidInput(
                "nombre and password are required".to_string(),
            ))
        }
    };

    let (account, token) = state
        .auth
        .authenticate(&nombre, &password)
        .await
        .map_err(|e| match e {
            crate::auth::AuthError::InvalidCredentials => ServiceError::InvalidCredentials,
            other => ServiceError::InternalError(other.to_string()),
        })?;

    Ok(success_response(LoginResponse {
        id: account.id,
        nombre: account.nombre,
        apellido: account.apellido,
        rol: account.rol,
        token,
    }))
}

/// Identity of the current token holder
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(current_user: AuthUser) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(current_user))
}

/// Creates the router for auth endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .merge(Router::new().route("/me", get(me)).with_auth())
}
