use crate::{
    auth::AuthUser,
    entities::{product, product_sale, pump_reading, shift, Product, ProductSale, PumpReading, Shift},
    errors::ServiceError,
    services::ProductService,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    error::SqlErr, sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, Value,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Fixed pump fleet size: every shift opens with readings for pumps 1..=4
const PUMP_COUNT: i32 = 4;

/// Shift history page size
const SHIFT_HISTORY_LIMIT: u64 = 50;

/// The open shift with its readings and sales eagerly aggregated
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveShift {
    #[serde(flatten)]
    pub shift: shift::Model,
    pub surtidores: Vec<pump_reading::Model>,
    pub ventas: Vec<product_sale::Model>,
}

/// Service for the till lifecycle: open, record readings and sales, close.
///
/// The two global invariants (one open shift, stock never negative) are
/// enforced at the store level rather than by check-then-write: the partial
/// unique index on `turnos.estado` backs the open pre-check, and the sale
/// transaction pairs the insert with a conditional decrement.
#[derive(Clone)]
pub struct ShiftService {
    db: Arc<DatabaseConnection>,
    products: Arc<ProductService>,
    fuel_price: Decimal,
}

impl ShiftService {
    pub fn new(db: Arc<DatabaseConnection>, products: Arc<ProductService>, fuel_price: Decimal) -> Self {
        Self {
            db,
            products,
            fuel_price,
        }
    }

    /// Opens a shift and seeds its pump readings in one transaction.
    ///
    /// The existence check gives a friendly error in the common case; the
    /// unique partial index turns the remaining race between concurrent
    /// opens into a constraint violation, mapped to the same error.
    #[instrument(skip(self, manager))]
    pub async fn open_shift(
        &self,
        fecha: NaiveDate,
        tipo: String,
        manager: &AuthUser,
    ) -> Result<shift::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let already_open = Shift::find()
            .filter(shift::Column::Estado.eq(shift::ShiftStatus::Abierto))
            .one(&txn)
            .await?;
        if already_open.is_some() {
            return Err(ServiceError::ShiftAlreadyOpen);
        }

        let opened = shift::ActiveModel {
            fecha: Set(fecha),
            tipo: Set(tipo),
            encargado_id: Set(manager.id),
            encargado_nombre: Set(manager.display_name()),
            estado: Set(shift::ShiftStatus::Abierto),
            fecha_apertura: Set(Utc::now()),
            fecha_cierre: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_open_conflict)?;

        for numero in 1..=PUMP_COUNT {
            pump_reading::ActiveModel {
                turno_id: Set(opened.id),
                numero_surtidor: Set(numero),
                lectura_inicial: Set(Decimal::ZERO),
                lectura_final: Set(Decimal::ZERO),
                precio_metro: Set(self.fuel_price),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await.map_err(map_open_conflict)?;

        info!(shift_id = opened.id, "shift opened");
        Ok(opened)
    }

    /// The single open shift with readings and sales, or None. Absence is a
    /// well-defined state, not an error.
    #[instrument(skip(self))]
    pub async fn active_shift(&self) -> Result<Option<ActiveShift>, ServiceError> {
        let open = Shift::find()
            .filter(shift::Column::Estado.eq(shift::ShiftStatus::Abierto))
            .one(&*self.db)
            .await?;

        let Some(open) = open else {
            return Ok(None);
        };

        let surtidores = open
            .find_related(PumpReading)
            .order_by_asc(pump_reading::Column::NumeroSurtidor)
            .all(&*self.db)
            .await?;

        let ventas = open
            .find_related(ProductSale)
            .order_by_asc(product_sale::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(Some(ActiveShift {
            shift: open,
            surtidores,
            ventas,
        }))
    }

    /// Overwrites the meter values of one pump reading. Rejects readings
    /// whose owning shift is no longer open, and final values below the
    /// initial one.
    #[instrument(skip(self))]
    pub async fn update_reading(
        &self,
        reading_id: i32,
        lectura_inicial: Decimal,
        lectura_final: Decimal,
    ) -> Result<pump_reading::Model, ServiceError> {
        let reading = PumpReading::find_by_id(reading_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Pump reading {} not found", reading_id))
            })?;

        let owner = reading
            .find_related(Shift)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "pump reading {} has no owning shift",
                    reading_id
                ))
            })?;

        if owner.estado != shift::ShiftStatus::Abierto {
            return Err(ServiceError::ShiftNotOpen(format!(
                "shift {} is closed",
                owner.id
            )));
        }

        if lectura_final < lectura_inicial {
            return Err(ServiceError::InvalidReading(format!(
                "final reading {} is below initial reading {}",
                lectura_final, lectura_inicial
            )));
        }

        let mut reading: pump_reading::ActiveModel = reading.into();
        reading.lectura_inicial = Set(lectura_inicial);
        reading.lectura_final = Set(lectura_final);
        let reading = reading.update(&*self.db).await?;

        Ok(reading)
    }

    /// Records a product sale against a shift, snapshotting name and price,
    /// and decrements stock in the same transaction. Either both writes land
    /// or neither does; the decrement's affected-row check keeps stock
    /// non-negative under concurrent sales.
    #[instrument(skip(self))]
    pub async fn record_sale(
        &self,
        turno_id: i32,
        producto_id: i32,
        cantidad: i32,
    ) -> Result<product_sale::Model, ServiceError> {
        if cantidad <= 0 {
            return Err(ServiceError::InvalidInput(
                "cantidad must be a positive integer".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let owner = Shift::find_by_id(turno_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shift {} not found", turno_id)))?;

        if owner.estado != shift::ShiftStatus::Abierto {
            return Err(ServiceError::ShiftNotOpen(format!(
                "shift {} is closed",
                owner.id
            )));
        }

        let item = Product::find_by_id(producto_id)
            .filter(product::Column::Activo.eq(true))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", producto_id)))?;

        if item.stock < cantidad {
            return Err(ServiceError::InsufficientStock(format!(
                "product {} has {} units in stock, {} requested",
                producto_id, item.stock, cantidad
            )));
        }

        let total = item.precio * Decimal::from(cantidad);

        let sale = product_sale::ActiveModel {
            turno_id: Set(owner.id),
            producto_id: Set(item.id),
            producto_nombre: Set(item.nombre.clone()),
            cantidad: Set(cantidad),
            precio_unitario: Set(item.precio),
            total: Set(total),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        self.products
            .decrement_stock(&txn, producto_id, cantidad)
            .await?;

        txn.commit().await?;

        info!(
            sale_id = sale.id,
            shift_id = turno_id,
            product_id = producto_id,
            "sale recorded"
        );
        Ok(sale)
    }

    /// Transitions a shift open→closed. The state predicate lives in the
    /// UPDATE, so a shift can only be closed once; readings and sales are
    /// left untouched as the historical record.
    #[instrument(skip(self))]
    pub async fn close_shift(&self, turno_id: i32) -> Result<shift::Model, ServiceError> {
        let result = Shift::update_many()
            .col_expr(
                shift::Column::Estado,
                Expr::value(Value::from(shift::ShiftStatus::Cerrado)),
            )
            .col_expr(
                shift::Column::FechaCierre,
                Expr::value(Value::from(Some(Utc::now()))),
            )
            .filter(shift::Column::Id.eq(turno_id))
            .filter(shift::Column::Estado.eq(shift::ShiftStatus::Abierto))
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Shift {} not found or already closed",
                turno_id
            )));
        }

        let closed = Shift::find_by_id(turno_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shift {} not found", turno_id)))?;

        info!(shift_id = turno_id, "shift closed");
        Ok(closed)
    }

    /// Most recent shifts, newest date first with the type string as a
    /// lexicographic tie-break. The ordering matches what the till frontend
    /// has always been shown, so it is preserved verbatim.
    #[instrument(skip(self))]
    pub async fn list_shifts(&self) -> Result<Vec<shift::Model>, ServiceError> {
        let shifts = Shift::find()
            .order_by_desc(shift::Column::Fecha)
            .order_by_desc(shift::Column::Tipo)
            .limit(SHIFT_HISTORY_LIMIT)
            .all(&*self.db)
            .await?;
        Ok(shifts)
    }
}

/// An insert/commit that trips the one-open-shift unique index means
/// another request opened a shift in the race window.
fn map_open_conflict(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::ShiftAlreadyOpen,
        _ => ServiceError::DatabaseError(err),
    }
}
