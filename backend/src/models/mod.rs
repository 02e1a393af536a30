//! Database models for the retail POS backend
//!
//! Re-exports the shared domain models and adds the row types the services
//! read from PostgreSQL. Payment, status, and role labels are stored as text
//! and parsed back into the closed enum sets on the way out; an unknown label
//! in a row is an internal error, never a client-facing one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

pub use shared::models::*;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub login: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(anyhow::Error::new)?;
        Ok(User {
            id: row.id,
            full_name: row.full_name,
            login: row.login,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub unit: String,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub stock_qty: Decimal,
    pub min_stock_qty: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            unit: row.unit,
            cost_price: row.cost_price,
            sale_price: row.sale_price,
            stock_qty: row.stock_qty,
            min_stock_qty: row.min_stock_qty,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: i64,
    pub receipt_no: i64,
    pub seller_id: i64,
    pub total: Decimal,
    pub discount: Decimal,
    pub payment_type: String,
    pub cash_amount: Decimal,
    pub card_amount: Decimal,
    pub customer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = AppError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        let payment_type = row.payment_type.parse().map_err(anyhow::Error::new)?;
        Ok(Sale {
            id: row.id,
            receipt_no: row.receipt_no,
            seller_id: row.seller_id,
            total: row.total,
            discount: row.discount,
            payment_type,
            cash_amount: row.cash_amount,
            card_amount: row.card_amount,
            customer_id: row.customer_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SaleItemRow {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub qty: Decimal,
    pub sale_price: Decimal,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        SaleItem {
            id: row.id,
            sale_id: row.sale_id,
            product_id: row.product_id,
            qty: row.qty,
            sale_price: row.sale_price,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DebtRow {
    pub id: i64,
    pub customer_id: i64,
    pub sale_id: i64,
    pub debt_total: Decimal,
    pub paid_total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DebtRow> for Debt {
    type Error = AppError;

    fn try_from(row: DebtRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(anyhow::Error::new)?;
        Ok(Debt {
            id: row.id,
            customer_id: row.customer_id,
            sale_id: row.sale_id,
            debt_total: row.debt_total,
            paid_total: row.paid_total,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DebtPaymentRow {
    pub id: i64,
    pub debt_id: i64,
    pub amount: Decimal,
    pub payment_type: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DebtPaymentRow> for DebtPayment {
    type Error = AppError;

    fn try_from(row: DebtPaymentRow) -> Result<Self, Self::Error> {
        let payment_type = row.payment_type.parse().map_err(anyhow::Error::new)?;
        Ok(DebtPayment {
            id: row.id,
            debt_id: row.debt_id,
            amount: row.amount,
            payment_type,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PurchaseRow {
    pub id: i64,
    pub supplier_id: Option<i64>,
    pub note: Option<String>,
    pub total_cost: Decimal,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Purchase {
            id: row.id,
            supplier_id: row.supplier_id,
            note: row.note,
            total_cost: row.total_cost,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PurchaseItemRow {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    pub qty: Decimal,
    pub cost_price: Decimal,
}

impl From<PurchaseItemRow> for PurchaseItem {
    fn from(row: PurchaseItemRow) -> Self {
        PurchaseItem {
            id: row.id,
            purchase_id: row.purchase_id,
            product_id: row.product_id,
            qty: row.qty,
            cost_price: row.cost_price,
        }
    }
}
