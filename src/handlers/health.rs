use crate::{db, errors::ErrorBody, handlers::AppState};
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

/// Service metadata and endpoint map
pub async fn root_info() -> impl IntoResponse {
    Json(json!({
        "message": "Gas Station Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "docs": "/swagger-ui",
            "auth": "/api/auth",
            "users": "/api/users",
            "products": "/api/products",
            "shifts": "/api/shifts"
        }
    }))
}

/// Liveness check that also pings the store
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    match db::check_connection(&state.db).await {
        Ok(()) => Json(json!({
            "status": "OK",
            "timestamp": Utc::now().to_rfc3339(),
            "environment": state.config.environment,
        }))
        .into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "UNAVAILABLE",
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
            .into_response(),
    }
}

/// Fallback for unknown routes, in the standard failure envelope
pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            success: false,
            message: format!("Route {} not found", uri.path()),
            errors: None,
        }),
    )
        .into_response()
}
