use super::common::{created_response, list_response, message_response, success_response};
use crate::{
    auth::AuthRouterExt,
    errors::ServiceError,
    handlers::AppState,
    services::products::{CreateProductInput, UpdateProductInput},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

// Request DTOs. `nombre` and `precio` stay optional at the serde level so a
// missing field surfaces as the API's own invalid-input error instead of a
// deserialization rejection.

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "nombre": "Aceite 2T",
    "precio": "3500.50",
    "stock": 24
}))]
pub struct CreateProductRequest {
    #[schema(example = "Aceite 2T")]
    pub nombre: Option<String>,
    pub precio: Option<Decimal>,
    /// Defaults to 0 when omitted
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub nombre: Option<String>,
    pub precio: Option<Decimal>,
    pub stock: Option<i32>,
}

/// List active products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Active products ordered by name"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.products.list_active().await?;
    Ok(list_response(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (nombre, precio) = match (payload.nombre, payload.precio) {
        (Some(nombre), Some(precio)) if !nombre.trim().is_empty() => (nombre, precio),
        _ => {
            return Err(ServiceError::InvalidInput(
                "nombre and precio are required".to_string(),
            ))
        }
    };

    let item = state
        .services
        .products
        .create(CreateProductInput {
            nombre,
            precio,
            stock: payload.stock,
        })
        .await?;

    Ok(created_response(item))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Not found", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (nombre, precio, stock) = match (payload.nombre, payload.precio, payload.stock) {
        (Some(nombre), Some(precio), Some(stock)) if !nombre.trim().is_empty() => {
            (nombre, precio, stock)
        }
        _ => {
            return Err(ServiceError::InvalidInput(
                "nombre, precio and stock are required".to_string(),
            ))
        }
    };

    let item = state
        .services
        .products
        .update(
            product_id,
            UpdateProductInput {
                nombre,
                precio,
                stock,
            },
        )
        .await?;

    Ok(success_response(item))
}

/// Soft-delete a product
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product removed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Not found", body = crate::errors::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.soft_delete(product_id).await?;
    Ok(message_response("Product removed successfully"))
}

/// Creates the router for product endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
        .with_auth()
}
