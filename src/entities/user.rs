use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Staff account. `password` holds the argon2 hash and is never serialized.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "usuarios")]
#[schema(as = Usuario)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login name, unique among active users
    pub nombre: String,

    pub apellido: String,

    #[serde(skip_serializing)]
    #[schema(write_only)]
    pub password: String,

    pub rol: UserRole,

    /// Soft-delete flag; inactive users cannot log in and are hidden from listings
    pub activo: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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

/// Staff role, checked by the role-gated routes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Employee => "employee",
        }
    }
}
