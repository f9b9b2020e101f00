/*!
 * # Authentication and Authorization Module
 *
 * JWT-based authentication for the gas-station API. Tokens are
 * self-contained (no server-side session store): the signed claims embed the
 * user id and role, and every authenticated request re-resolves the id
 * against the active user rows, so a soft-deleted user loses access as soon
 * as their row is deactivated.
 *
 * Role checks are pure functions over the resolved identity; admin-only
 * routes are wired through [`AuthRouterExt::with_role`].
 */

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{user, User};
use crate::errors::ErrorBody;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // Subject (user ID)
    pub nombre: String, // Login name
    pub rol: String,    // Role at issue time
    pub jti: String,    // JWT ID (unique identifier for this token)
    pub iat: i64,       // Issued at time
    pub exp: i64,       // Expiration time
    pub nbf: i64,       // Not valid before time
    pub iss: String,    // Issuer
    pub aud: String,    // Audience
}

/// Authenticated identity resolved from a valid token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub rol: user::UserRole,
}

impl AuthUser {
    pub fn has_role(&self, role: user::UserRole) -> bool {
        self.rol == role
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(user::UserRole::Admin)
    }

    /// Display name snapshotted onto shifts opened by this user
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            token_expiration,
        }
    }
}

/// Authentication service that handles credential checks and token issuance
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Hash a password for storage
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Verify credentials against the active user rows and issue a token
    pub async fn authenticate(
        &self,
        nombre: &str,
        password: &str,
    ) -> Result<(user::Model, String), AuthError> {
        let account = User::find()
            .filter(user::Column::Nombre.eq(nombre))
            .filter(user::Column::Activo.eq(true))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &account.password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.generate_token(&account)?;
        debug!(user_id = account.id, "issued token");
        Ok((account, token))
    }

    /// Generate a signed JWT for a user
    pub fn generate_token(&self, account: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: account.id.to_string(),
            nombre: account.nombre.clone(),
            rol: account.rol.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        Ok(claims)
    }

    /// Resolve validated claims to the current active user row.
    /// A deactivated user fails here even with an otherwise valid token.
    pub async fn resolve_user(&self, claims: &Claims) -> Result<AuthUser, AuthError> {
        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        let account = User::find_by_id(user_id)
            .filter(user::Column::Activo.eq(true))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthUser {
            id: account.id,
            nombre: account.nombre,
            apellido: account.apellido,
            rol: account.rol,
        })
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No authentication token provided")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::UserNotFound => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::TokenCreation(_) | Self::DatabaseError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            success: false,
            message,
            errors: None,
        };

        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Authentication middleware: validates the bearer token and attaches the
/// resolved [`AuthUser`] to the request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("Authentication service not available".to_string())
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service).await {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Extract and resolve the bearer token from request headers
async fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = auth_service.validate_token(token)?;
    auth_service.resolve_user(&claims).await
}

/// Role middleware: rejects requests whose authenticated user lacks the role
pub async fn role_middleware(
    State(required_role): State<user::UserRole>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingToken)?;

    if !auth_user.has_role(required_role) {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_role(self, role: user::UserRole) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_role(self, role: user::UserRole) -> Self {
        self.layer(axum::middleware::from_fn_with_state(role, role_middleware))
            .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserRole;

    fn test_service() -> AuthService {
        let config = AuthConfig::new(
            "0f8fad5bd9cb469fa165408766e3d7a2b41c9e63".to_string(),
            "estacion-api".to_string(),
            "estacion-clients".to_string(),
            Duration::from_secs(3600),
        );
        AuthService::new(config, Arc::new(DatabaseConnection::default()))
    }

    fn test_account() -> user::Model {
        user::Model {
            id: 7,
            nombre: "maria".to_string(),
            apellido: "gomez".to_string(),
            password: String::new(),
            rol: UserRole::Admin,
            activo: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let service = test_service();
        let hash = service.hash_password("hunter2-secret").unwrap();
        assert_ne!(hash, "hunter2-secret");
        assert!(service.verify_password("hunter2-secret", &hash));
        assert!(!service.verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_password_rejects_garbage_hash() {
        let service = test_service();
        assert!(!service.verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let service = test_service();
        let token = service.generate_token(&test_account()).unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.nombre, "maria");
        assert_eq!(claims.rol, "admin");
        assert_eq!(claims.iss, "estacion-api");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let token = service.generate_token(&test_account()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        assert!(matches!(
            service.validate_token(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "7".to_string(),
            nombre: "maria".to_string(),
            rol: "admin".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: (now - ChronoDuration::hours(2)).timestamp(),
            exp: (now - ChronoDuration::hours(1)).timestamp(),
            nbf: (now - ChronoDuration::hours(2)).timestamp(),
            iss: service.config.jwt_issuer.clone(),
            aud: service.config.jwt_audience.clone(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(service.config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_from_other_issuer_is_rejected() {
        let service = test_service();
        let other = AuthService::new(
            AuthConfig::new(
                service.config.jwt_secret.clone(),
                "someone-else".to_string(),
                service.config.jwt_audience.clone(),
                Duration::from_secs(3600),
            ),
            Arc::new(DatabaseConnection::default()),
        );

        let token = other.generate_token(&test_account()).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
