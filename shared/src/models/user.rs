//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserRole;

/// A cashier or admin account. The password hash never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub login: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
