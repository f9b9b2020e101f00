use crate::{
    entities::{product, Product},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for the product ledger: CRUD with soft delete, plus the
/// stock decrement used by sale recording.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

/// Input for creating a product
#[derive(Debug)]
pub struct CreateProductInput {
    pub nombre: String,
    pub precio: Decimal,
    pub stock: Option<i32>,
}

/// Input for updating a product
#[derive(Debug)]
pub struct UpdateProductInput {
    pub nombre: String,
    pub precio: Decimal,
    pub stock: i32,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active products ordered by name
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<product::Model>, ServiceError> {
        let products = Product::find()
            .filter(product::Column::Activo.eq(true))
            .order_by_asc(product::Column::Nombre)
            .all(&*self.db)
            .await?;
        Ok(products)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateProductInput) -> Result<product::Model, ServiceError> {
        if input.stock.unwrap_or(0) < 0 {
            return Err(ServiceError::InvalidInput(
                "stock cannot be negative".to_string(),
            ));
        }

        let item = product::ActiveModel {
            nombre: Set(input.nombre),
            precio: Set(input.precio),
            stock: Set(input.stock.unwrap_or(0)),
            ..Default::default()
        };

        let item = item.insert(&*self.db).await?;

        info!(product_id = item.id, "product created");
        Ok(item)
    }

    /// Updates an active product; soft-deleted products are not reachable here
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        product_id: i32,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        if input.stock < 0 {
            return Err(ServiceError::InvalidInput(
                "stock cannot be negative".to_string(),
            ));
        }

        let item = Product::find_by_id(product_id)
            .filter(product::Column::Activo.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let mut item: product::ActiveModel = item.into();
        item.nombre = Set(input.nombre);
        item.precio = Set(input.precio);
        item.stock = Set(input.stock);

        let item = item.update(&*self.db).await?;

        info!(product_id = item.id, "product updated");
        Ok(item)
    }

    /// Soft delete: flips `activo` off, the row is retained
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, product_id: i32) -> Result<(), ServiceError> {
        let item = Product::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let mut item: product::ActiveModel = item.into();
        item.activo = Set(false);
        item.update(&*self.db).await?;

        info!(product_id, "product deactivated");
        Ok(())
    }

    /// Conditional stock decrement. The `stock >= cantidad` predicate is part
    /// of the UPDATE itself, so a concurrent sale can never drive stock
    /// negative; zero affected rows means the stock was insufficient at
    /// execution time. Runs on the caller's connection so sale recording can
    /// place it inside its transaction.
    #[instrument(skip(self, conn))]
    pub async fn decrement_stock<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i32,
        cantidad: i32,
    ) -> Result<(), ServiceError> {
        let result = Product::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).sub(Expr::val(cantidad)),
            )
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::Activo.eq(true))
            .filter(product::Column::Stock.gte(cantidad))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::InsufficientStock(format!(
                "product {} does not have {} units in stock",
                product_id, cantidad
            )));
        }

        Ok(())
    }
}
