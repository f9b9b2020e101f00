pub mod auth;
pub mod common;
pub mod health;
pub mod products;
pub mod shifts;
pub mod users;

use crate::db::DbPool;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<crate::services::UserService>,
    pub products: Arc<crate::services::ProductService>,
    pub shifts: Arc<crate::services::ShiftService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        auth_service: Arc<crate::auth::AuthService>,
        fuel_price: rust_decimal::Decimal,
    ) -> Self {
        let users = Arc::new(crate::services::UserService::new(
            db_pool.clone(),
            auth_service,
        ));
        let products = Arc::new(crate::services::ProductService::new(db_pool.clone()));
        let shifts = Arc::new(crate::services::ShiftService::new(
            db_pool,
            products.clone(),
            fuel_price,
        ));

        Self {
            users,
            products,
            shifts,
        }
    }
}
