use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fuel-pump meter reading (surtidor). Exactly four are created per shift,
/// numbered 1..=4, and mutated only while the owning shift is open.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "surtidores")]
#[schema(as = Surtidor)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub turno_id: i32,

    /// Pump number within the fixed fleet (1..=4)
    pub numero_surtidor: i32,

    pub lectura_inicial: Decimal,

    pub lectura_final: Decimal,

    /// Per-cubic-meter fuel price, snapshotted at shift open
    pub precio_metro: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shift::Entity",
        from = "Column::TurnoId",
        to = "super::shift::Column::Id"
    )]
    Shift,
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
