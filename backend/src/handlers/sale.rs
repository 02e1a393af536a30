//! HTTP handlers for sales

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::sale::{CreateSaleInput, SaleListQuery, SaleWithDetails};
use crate::services::SaleService;
use crate::AppState;

/// Create a sale. The seller is the authenticated cashier.
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<Json<SaleWithDetails>> {
    let service = SaleService::new(state.db);
    let sale = service.create_sale(current_user.0.id, input).await?;
    Ok(Json(sale))
}

/// List sales, newest first
pub async fn list_sales(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SaleListQuery>,
) -> AppResult<Json<Vec<SaleWithDetails>>> {
    let service = SaleService::new(state.db);
    let sales = service.list_sales(&query).await?;
    Ok(Json(sales))
}
