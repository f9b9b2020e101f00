use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Product sale recorded against a shift. `producto_nombre`,
/// `precio_unitario` and `total` are value copies taken at sale time; they
/// are never re-derived from the live product row. Rows are immutable after
/// insert and retained for history when the shift closes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "ventas_productos")]
#[schema(as = VentaProducto)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub turno_id: i32,

    pub producto_id: i32,

    /// Product name at sale time
    pub producto_nombre: String,

    pub cantidad: i32,

    /// Unit price at sale time
    pub precio_unitario: Decimal,

    /// cantidad × precio_unitario, computed at insert
    pub total: Decimal,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shift::Entity",
        from = "Column::TurnoId",
        to = "super::shift::Column::Id"
    )]
    Shift,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductoId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
