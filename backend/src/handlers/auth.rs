//! Authentication handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use shared::types::UserRole;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::LoginResponse;
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// The identity carried by the caller's token
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub full_name: String,
    pub role: UserRole,
    pub login: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service
        .login(
            body.login.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(response))
}

/// Current identity endpoint handler; answered from the token alone.
pub async fn me(current_user: CurrentUser) -> Json<MeResponse> {
    let user = current_user.0;
    Json(MeResponse {
        id: user.id,
        full_name: user.full_name,
        role: user.role,
        login: user.login,
    })
}
