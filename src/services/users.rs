use crate::{
    auth::AuthService,
    entities::{user, User},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for managing staff accounts
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
}

/// Input for creating a user
#[derive(Debug)]
pub struct CreateUserInput {
    pub nombre: String,
    pub apellido: String,
    pub password: String,
    pub rol: Option<user::UserRole>,
}

/// Input for updating a user; a `password` re-hashes the credential
#[derive(Debug)]
pub struct UpdateUserInput {
    pub nombre: String,
    pub apellido: String,
    pub rol: user::UserRole,
    pub password: Option<String>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    /// Active users ordered by name; password hashes stay in the row
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<user::Model>, ServiceError> {
        let users = User::find()
            .filter(user::Column::Activo.eq(true))
            .order_by_asc(user::Column::Nombre)
            .all(&*self.db)
            .await?;
        Ok(users)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        let password_hash = self
            .auth
            .hash_password(&input.password)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;

        let account = user::ActiveModel {
            nombre: Set(input.nombre),
            apellido: Set(input.apellido),
            password: Set(password_hash),
            rol: Set(input.rol.unwrap_or(user::UserRole::Employee)),
            ..Default::default()
        };

        let account = account.insert(&*self.db).await?;

        info!(user_id = account.id, "user created");
        Ok(account)
    }

    /// Updates an active user; soft-deleted users are not reachable here
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        user_id: i32,
        input: UpdateUserInput,
    ) -> Result<user::Model, ServiceError> {
        let account = User::find_by_id(user_id)
            .filter(user::Column::Activo.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let mut account: user::ActiveModel = account.into();
        account.nombre = Set(input.nombre);
        account.apellido = Set(input.apellido);
        account.rol = Set(input.rol);

        if let Some(password) = input.password {
            let password_hash = self
                .auth
                .hash_password(&password)
                .map_err(|e| ServiceError::HashError(e.to_string()))?;
            account.password = Set(password_hash);
        }

        let account = account.update(&*self.db).await?;

        info!(user_id = account.id, "user updated");
        Ok(account)
    }

    /// Soft delete: flips `activo` off, the row is retained
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, user_id: i32) -> Result<(), ServiceError> {
        let account = User::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let mut account: user::ActiveModel = account.into();
        account.activo = Set(false);
        account.update(&*self.db).await?;

        info!(user_id, "user deactivated");
        Ok(())
    }
}
