//! HTTP handlers for purchases (stock-in)

use axum::{extract::State, Json};

use shared::models::Purchase;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase::{CreatePurchaseInput, PurchaseWithDetails};
use crate::services::PurchaseService;
use crate::AppState;

/// Record a purchase
pub async fn create_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<Json<Purchase>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.create_purchase(current_user.0.id, input).await?;
    Ok(Json(purchase))
}

/// List purchases, newest first
pub async fn list_purchases(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PurchaseWithDetails>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service.list_purchases().await?;
    Ok(Json(purchases))
}
