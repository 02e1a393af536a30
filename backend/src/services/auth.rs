//! Authentication service for cashier login and token issuance

use anyhow::anyhow;
use bcrypt::verify;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shared::models::User;
use shared::types::UserRole;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    token_expiry: i64,
}

/// JWT claims structure. The payload mirrors what the middleware expects:
/// identity plus role, so protected handlers never need a user lookup.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: i64,
    pub role: String,
    pub full_name: String,
    pub login: String,
    pub exp: i64,
    pub iat: i64,
}

/// Successful login: a bearer token and the account behind it
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// User row including the password hash; never serialized
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    full_name: String,
    login: String,
    role: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            token_expiry: config.jwt.token_expiry,
        }
    }

    /// Authenticate a cashier or admin by login and password. Unknown
    /// logins, disabled accounts, and wrong passwords all report the same
    /// BAD_CREDENTIALS.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<LoginResponse> {
        if login.trim().is_empty() || password.is_empty() {
            return Err(AppError::LoginPasswordRequired);
        }

        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, full_name, login, role, password_hash, is_active, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::BadCredentials)?;

        if !row.is_active {
            return Err(AppError::BadCredentials);
        }

        let valid = verify(password, &row.password_hash)
            .map_err(|e| anyhow!("password verification failed: {e}"))?;
        if !valid {
            return Err(AppError::BadCredentials);
        }

        let role = row.role.parse::<UserRole>().map_err(anyhow::Error::new)?;
        let token = self.generate_token(row.id, role, &row.full_name, &row.login)?;

        tracing::info!(user_id = row.id, login = %row.login, "login succeeded");

        Ok(LoginResponse {
            token,
            user: User {
                id: row.id,
                full_name: row.full_name,
                login: row.login,
                role,
                is_active: row.is_active,
                created_at: row.created_at,
            },
        })
    }

    /// Sign a bearer token carrying the account's identity and role.
    fn generate_token(
        &self,
        id: i64,
        role: UserRole,
        full_name: &str,
        login: &str,
    ) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            id,
            role: role.as_str().to_string(),
            full_name: full_name.to_string(),
            login: login.to_string(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow!("token generation failed: {e}")))
    }
}
