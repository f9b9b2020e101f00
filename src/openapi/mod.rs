use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gas Station Management API",
        version = "1.0.0",
        description = r#"
# Gas Station Management API

REST backend for a service-station: authentication, staff management,
product inventory, and the till-shift lifecycle with per-pump meter
readings and product sales.

## Authentication

All `/api` endpoints except `POST /api/auth/login` require a bearer token:

```
Authorization: Bearer <your-jwt-token>
```

## Response envelope

Successful responses use `{"success": true, "data": ...}`; listings add
`"count"`. Failures use `{"success": false, "message": "..."}` with an
optional `"errors"` array for validation details.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Staff management endpoints (admin only)"),
        (name = "products", description = "Product inventory endpoints"),
        (name = "shifts", description = "Shift lifecycle endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Auth
        crate::handlers::auth::login,
        crate::handlers::auth::me,

        // Users
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,

        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Shifts
        crate::handlers::shifts::get_active_shift,
        crate::handlers::shifts::list_shifts,
        crate::handlers::shifts::open_shift,
        crate::handlers::shifts::update_reading,
        crate::handlers::shifts::record_sale,
        crate::handlers::shifts::close_shift,

        // Health
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            // Common envelope
            crate::ApiResponse<serde_json::Value>,
            crate::errors::ErrorBody,

            // Auth types
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,

            // User types
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::entities::user::Model,
            crate::entities::user::UserRole,

            // Product types
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,
            crate::entities::product::Model,

            // Shift types
            crate::handlers::shifts::OpenShiftRequest,
            crate::handlers::shifts::UpdateReadingRequest,
            crate::handlers::shifts::RecordSaleRequest,
            crate::entities::shift::Model,
            crate::entities::shift::ShiftStatus,
            crate::entities::pump_reading::Model,
            crate::entities::product_sale::Model,
            crate::services::shifts::ActiveShift,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Gas Station Management API"));
        assert!(json.contains("/api/shifts/active"));
        assert!(json.contains("bearer_auth"));
    }
}
