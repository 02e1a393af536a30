//! Purchase (stock-in) ingestion
//!
//! Purchases only add stock, so there is no floor to defend; the whole
//! intake is still one atomic transaction so a bad line leaves nothing
//! behind.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shared::models::{purchase_total, Product, Purchase, PurchaseItem, User};
use shared::validation::{is_valid_product_id, is_valid_qty};

use crate::error::{AppError, AppResult};
use crate::models::{ProductRow, PurchaseItemRow, PurchaseRow, UserRow};

/// Purchase service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Input for recording a purchase
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseInput {
    pub supplier_id: Option<i64>,
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<PurchaseItemInput>,
}

/// One received line: quantity and cost, with an optional new sale price
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemInput {
    pub product_id: i64,
    pub qty: Decimal,
    pub cost_price: Decimal,
    pub sale_price: Option<Decimal>,
}

/// A purchase item together with its product
#[derive(Debug, Serialize)]
pub struct PurchaseItemWithProduct {
    #[serde(flatten)]
    pub item: PurchaseItem,
    pub product: Product,
}

/// A purchase with its creator and lines
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWithDetails {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub user: User,
    pub items: Vec<PurchaseItemWithProduct>,
}

impl PurchaseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a purchase: insert the header and lines, increment each
    /// product's stock, overwrite its cost price, and optionally overwrite
    /// its sale price. All of it commits or none of it does.
    pub async fn create_purchase(
        &self,
        created_by: i64,
        input: CreatePurchaseInput,
    ) -> AppResult<Purchase> {
        if input.items.is_empty() {
            return Err(AppError::ItemsRequired);
        }
        for item in &input.items {
            if !is_valid_product_id(item.product_id) {
                return Err(AppError::ProductIdInvalid);
            }
            if !is_valid_qty(item.qty) {
                return Err(AppError::QtyInvalid);
            }
        }

        let lines: Vec<(Decimal, Decimal)> = input
            .items
            .iter()
            .map(|it| (it.qty, it.cost_price))
            .collect();
        let total_cost = purchase_total(&lines);

        let mut tx = self.db.begin().await?;

        let purchase_row = sqlx::query_as::<_, PurchaseRow>(
            r#"
            INSERT INTO purchases (supplier_id, note, total_cost, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, supplier_id, note, total_cost, created_by, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(&input.note)
        .bind(total_cost)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            sqlx::query(
                "INSERT INTO purchase_items (purchase_id, product_id, qty, cost_price) VALUES ($1, $2, $3, $4)",
            )
            .bind(purchase_row.id)
            .bind(item.product_id)
            .bind(item.qty)
            .bind(item.cost_price)
            .execute(&mut *tx)
            .await?;

            let updated = sqlx::query(
                r#"
                UPDATE products
                SET stock_qty = stock_qty + $1,
                    cost_price = $2,
                    sale_price = COALESCE($3, sale_price)
                WHERE id = $4
                "#,
            )
            .bind(item.qty)
            .bind(item.cost_price)
            .bind(item.sale_price)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::ProductNotFound);
            }
        }

        tx.commit().await?;

        tracing::info!(purchase_id = purchase_row.id, %total_cost, "purchase recorded");

        Ok(Purchase::from(purchase_row))
    }

    /// List purchases newest first, with creator and lines.
    pub async fn list_purchases(&self) -> AppResult<Vec<PurchaseWithDetails>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, supplier_id, note, total_cost, created_by, created_at
            FROM purchases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut purchases = Vec::with_capacity(rows.len());
        for row in rows {
            let user_row = sqlx::query_as::<_, UserRow>(
                "SELECT id, full_name, login, role, is_active, created_at FROM users WHERE id = $1",
            )
            .bind(row.created_by)
            .fetch_one(&self.db)
            .await?;

            let item_rows = sqlx::query_as::<_, PurchaseItemRow>(
                "SELECT id, purchase_id, product_id, qty, cost_price FROM purchase_items WHERE purchase_id = $1 ORDER BY id",
            )
            .bind(row.id)
            .fetch_all(&self.db)
            .await?;

            let mut items = Vec::with_capacity(item_rows.len());
            for item_row in item_rows {
                let product_row = sqlx::query_as::<_, ProductRow>(
                    r#"
                    SELECT id, name, category_id, unit, cost_price, sale_price, stock_qty,
                           min_stock_qty, is_active, created_at
                    FROM products
                    WHERE id = $1
                    "#,
                )
                .bind(item_row.product_id)
                .fetch_one(&self.db)
                .await?;
                items.push(PurchaseItemWithProduct {
                    item: PurchaseItem::from(item_row),
                    product: Product::from(product_row),
                });
            }

            purchases.push(PurchaseWithDetails {
                purchase: Purchase::from(row),
                user: User::try_from(user_row)?,
                items,
            });
        }
        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_cost_sums_qty_times_cost() {
        let lines = [(dec!(10), dec!(700)), (dec!(5), dec!(60000))];
        assert_eq!(purchase_total(&lines), dec!(307000));
    }
}
