//! HTTP handlers for the product catalog
//!
//! Catalog mutations are admin-only; listing is open to any authenticated
//! user.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use shared::models::Product;
use shared::types::UserRole;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::product::{
    CreateProductInput, ProductListQuery, ProductWithCategory, UpdateProductInput,
};
use crate::services::ProductService;
use crate::AppState;

/// List active products with categories
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<ProductWithCategory>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products(&query).await?;
    Ok(Json(products))
}

/// Create a product (admin only)
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// Partially update a product (admin only)
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ProductService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Soft-delete a product (admin only)
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Product>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ProductService::new(state.db);
    let product = service.delete_product(product_id).await?;
    Ok(Json(product))
}
