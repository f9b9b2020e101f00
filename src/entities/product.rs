use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[sea_orm(table_name = "productos")]
#[schema(as = Producto)]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub nombre: String,

    /// Unit price
    pub precio: Decimal,

    /// Quantity on hand; never negative after any sale
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    /// Soft-delete flag; inactive products are hidden and cannot be sold
    pub activo: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_sale::Entity")]
    ProductSales,
}

impl Related<super::product_sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductSales.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.activo {
                active_model.activo = Set(true);
            }
            active_model.created_at = Set(Utc::now());
        }

        Ok(active_model)
    }
}
