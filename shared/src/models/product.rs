//! Catalog products

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product. Products are soft-deleted via `is_active`; stock is a
/// signed decimal that must never go negative through a committed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    /// Unit label shown on receipts (piece, kg, litre, ...)
    pub unit: String,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub stock_qty: Decimal,
    /// Advisory low-stock threshold, not enforced
    pub min_stock_qty: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
