use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Till shift (turno). At most one row may be `abierto` at any time; the
/// partial unique index on `estado` enforces it at the store level.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "turnos")]
#[schema(as = Turno)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Business date of the shift
    pub fecha: NaiveDate,

    /// Shift type, e.g. "dia" or "noche"
    pub tipo: String,

    /// Manager user id at open time
    pub encargado_id: i32,

    /// Manager display name, snapshotted at open time
    pub encargado_nombre: String,

    pub estado: ShiftStatus,

    pub fecha_apertura: DateTime<Utc>,

    /// Set once on close; null while the shift is open
    #[sea_orm(nullable)]
    pub fecha_cierre: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pump_reading::Entity")]
    PumpReadings,
    #[sea_orm(has_many = "super::product_sale::Entity")]
    ProductSales,
}

impl Related<super::pump_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PumpReadings.def()
    }
}

impl Related<super::product_sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductSales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Shift lifecycle state: open → closed, closed is terminal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    #[sea_orm(string_value = "abierto")]
    Abierto,
    #[sea_orm(string_value = "cerrado")]
    Cerrado,
}
