//! HTTP handlers for debts and debt payments

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::debt::{ApplyPaymentInput, DebtListQuery, DebtWithDetails};
use crate::services::DebtService;
use crate::AppState;

/// List debts, newest first
pub async fn list_debts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<DebtListQuery>,
) -> AppResult<Json<Vec<DebtWithDetails>>> {
    let service = DebtService::new(state.db);
    let debts = service.list_debts(&query).await?;
    Ok(Json(debts))
}

/// Apply a payment to a debt. The payer identity recorded on the payment
/// is the authenticated cashier.
pub async fn create_debt_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(debt_id): Path<i64>,
    Json(input): Json<ApplyPaymentInput>,
) -> AppResult<Json<DebtWithDetails>> {
    let service = DebtService::new(state.db);
    let debt = service
        .apply_payment(debt_id, current_user.0.id, input)
        .await?;
    Ok(Json(debt))
}
