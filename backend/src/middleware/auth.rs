//! Authentication middleware
//!
//! JWT bearer authentication and role gating. The authenticated identity is
//! attached to the request and passed explicitly into the services; seller
//! and creator ids are always server-derived, never taken from the body.

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use shared::types::UserRole;

use crate::error::AppError;

/// Authenticated user information extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
    pub full_name: String,
    pub login: String,
}

/// Authentication middleware that validates bearer tokens.
/// Note: the token is validated inline against the environment-provided
/// secret to avoid state dependency issues in the middleware layer.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return AppError::TokenRequired.into_response(),
    };

    let jwt_secret = std::env::var("POS__JWT__SECRET")
        .or_else(|_| std::env::var("POS_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(_) => return AppError::TokenInvalid.into_response(),
    };

    let role = match claims.role.parse::<UserRole>() {
        Ok(role) => role,
        Err(_) => return AppError::TokenInvalid.into_response(),
    };

    let auth_user = AuthUser {
        id: claims.id,
        role,
        full_name: claims.full_name,
        login: claims.login,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: i64,
    role: String,
    full_name: String,
    login: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate a bearer token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Extractor for the authenticated user.
/// Use this in handlers to get the current cashier/admin.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::NoAuthUser)
    }
}

/// Role gate for use in handlers.
/// Returns FORBIDDEN when the caller's role is not in the allowed set.
pub fn require_role(user: &AuthUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 7,
            role: "cashier".to_string(),
            full_name: "Test Cashier".to_string(),
            login: "cashier_7".to_string(),
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decode_accepts_valid_token() {
        let token = make_token("test-secret", 3600);
        let claims = decode_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.role, "cashier");
        assert_eq!(claims.login, "cashier_7");
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = make_token("test-secret", 3600);
        assert!(decode_jwt(&token, "other-secret").is_err());
    }

    #[test]
    fn decode_rejects_expired_token() {
        let token = make_token("test-secret", -3600);
        assert!(decode_jwt(&token, "test-secret").is_err());
    }

    #[test]
    fn role_gate() {
        let user = AuthUser {
            id: 1,
            role: UserRole::Cashier,
            full_name: "Test".to_string(),
            login: "test_1".to_string(),
        };
        assert!(require_role(&user, &[UserRole::Admin, UserRole::Cashier]).is_ok());
        assert!(matches!(
            require_role(&user, &[UserRole::Admin]),
            Err(AppError::Forbidden)
        ));
    }
}
