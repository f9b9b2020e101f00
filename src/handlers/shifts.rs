use super::common::{created_response, list_response, success_response};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    errors::ServiceError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

// Request DTOs

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "fecha": "2024-01-01",
    "tipo": "dia"
}))]
pub struct OpenShiftRequest {
    /// Business date of the shift
    pub fecha: NaiveDate,
    /// Shift type, e.g. "dia" or "noche"
    #[schema(example = "dia")]
    pub tipo: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "lectura_inicial": "1200.5",
    "lectura_final": "1350.0"
}))]
pub struct UpdateReadingRequest {
    pub lectura_inicial: Decimal,
    pub lectura_final: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "turno_id": 1,
    "producto_id": 3,
    "cantidad": 5
}))]
pub struct RecordSaleRequest {
    pub turno_id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
}

// Handler functions

/// The currently open shift with readings and sales, or `data: null`
#[utoipa::path(
    get,
    path = "/api/shifts/active",
    responses(
        (status = 200, description = "Open shift, or null when none is open"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn get_active_shift(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let active = state.services.shifts.active_shift().await?;
    Ok(success_response(active))
}

/// Shift history: most recent 50, date desc then type desc
#[utoipa::path(
    get,
    path = "/api/shifts",
    responses(
        (status = 200, description = "Recent shifts"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn list_shifts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let shifts = state.services.shifts.list_shifts().await?;
    Ok(list_response(shifts))
}

/// Open a shift; fails while another shift is open
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = OpenShiftRequest,
    responses(
        (status = 201, description = "Shift opened with its four pump readings"),
        (status = 400, description = "A shift is already open", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn open_shift(
    State(state): State<AppState>,
    current_user: AuthUser,
    Json(payload): Json<OpenShiftRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let opened = state
        .services
        .shifts
        .open_shift(payload.fecha, payload.tipo, &current_user)
        .await?;

    Ok(created_response(opened))
}

/// Overwrite the meter values of a pump reading
#[utoipa::path(
    put,
    path = "/api/shifts/surtidor/{id}",
    params(("id" = i32, Path, description = "Pump reading ID")),
    request_body = UpdateReadingRequest,
    responses(
        (status = 200, description = "Reading updated"),
        (status = 400, description = "Shift closed or final below initial", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Not found", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn update_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i32>,
    Json(payload): Json<UpdateReadingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let reading = state
        .services
        .shifts
        .update_reading(reading_id, payload.lectura_inicial, payload.lectura_final)
        .await?;

    Ok(success_response(reading))
}

/// Record a product sale against a shift
#[utoipa::path(
    post,
    path = "/api/shifts/sale",
    request_body = RecordSaleRequest,
    responses(
        (status = 201, description = "Sale recorded and stock decremented"),
        (status = 400, description = "Insufficient stock or shift closed", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Shift or product not found", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    Json(payload): Json<RecordSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state
        .services
        .shifts
        .record_sale(payload.turno_id, payload.producto_id, payload.cantidad)
        .await?;

    Ok(created_response(sale))
}

/// Close an open shift
#[utoipa::path(
    put,
    path = "/api/shifts/{id}/close",
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift closed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Shift not found or already closed", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn close_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let closed = state.services.shifts.close_shift(shift_id).await?;
    Ok(success_response(closed))
}

/// Creates the router for shift endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/active", get(get_active_shift))
        .route("/", get(list_shifts))
        .route("/", post(open_shift))
        .route("/surtidor/:id", put(update_reading))
        .route("/sale", post(record_sale))
        .route("/:id/close", put(close_shift))
        .with_auth()
}
