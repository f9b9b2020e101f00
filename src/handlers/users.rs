use super::common::{created_response, list_response, message_response, success_response, validate_input};
use crate::{
    auth::AuthRouterExt,
    entities::user::UserRole,
    errors::ServiceError,
    handlers::AppState,
    services::users::{CreateUserInput, UpdateUserInput},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "nombre": "juan",
    "apellido": "perez",
    "password": "un-secreto-decente",
    "rol": "employee"
}))]
pub struct CreateUserRequest {
    /// Login name, unique among active users
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    #[schema(example = "juan")]
    pub nombre: String,

    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    #[schema(example = "perez")]
    pub apellido: String,

    /// Plain-text password, hashed before storage
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,

    /// Defaults to `employee` when omitted
    pub rol: Option<UserRole>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub nombre: String,

    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub apellido: String,

    pub rol: UserRole,

    /// When present, the credential is re-hashed
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
}

// Handler functions

/// List active users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Active users ordered by name"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let users = state.services.users.list_active().await?;
    Ok(list_response(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let account = state
        .services
        .users
        .create(CreateUserInput {
            nombre: payload.nombre,
            apellido: payload.apellido,
            password: payload.password,
            rol: payload.rol,
        })
        .await?;

    Ok(created_response(account))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorBody),
        (status = 404, description = "Not found", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let account = state
        .services
        .users
        .update(
            user_id,
            UpdateUserInput {
                nombre: payload.nombre,
                apellido: payload.apellido,
                rol: payload.rol,
                password: payload.password,
            },
        )
        .await?;

    Ok(success_response(account))
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User removed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorBody),
        (status = 404, description = "Not found", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.soft_delete(user_id).await?;
    Ok(message_response("User removed successfully"))
}

/// Creates the router for user endpoints; every route is admin-only
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(delete_user))
        .with_role(UserRole::Admin)
}
