//! Product catalog service
//!
//! Plain CRUD over the catalog. Products are never hard-deleted; delete
//! flips `is_active` so historical sale lines keep their reference.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shared::models::{Category, Product};

use crate::error::{AppError, AppResult};
use crate::models::ProductRow;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Filters for listing products
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub unit: Option<String>,
    pub cost_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub stock_qty: Option<Decimal>,
    pub min_stock_qty: Option<Decimal>,
}

/// Partial update of a product; absent fields stay unchanged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub unit: Option<String>,
    pub cost_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub stock_qty: Option<Decimal>,
    pub min_stock_qty: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// A product with its category, as listed in the catalog
#[derive(Debug, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

/// Flat row for the catalog listing join
#[derive(Debug, sqlx::FromRow)]
struct ProductWithCategoryRow {
    id: i64,
    name: String,
    category_id: Option<i64>,
    unit: String,
    cost_price: Decimal,
    sale_price: Decimal,
    stock_qty: Decimal,
    min_stock_qty: Decimal,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    category_name: Option<String>,
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active products, optionally filtered by a name search, with
    /// their categories, name ascending.
    pub async fn list_products(
        &self,
        query: &ProductListQuery,
    ) -> AppResult<Vec<ProductWithCategory>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let rows = sqlx::query_as::<_, ProductWithCategoryRow>(
            r#"
            SELECT p.id, p.name, p.category_id, p.unit, p.cost_price, p.sale_price,
                   p.stock_qty, p.min_stock_qty, p.is_active, p.created_at,
                   c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.is_active = TRUE
              AND ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
            ORDER BY p.name ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let category = match (row.category_id, row.category_name) {
                    (Some(id), Some(name)) => Some(Category { id, name }),
                    _ => None,
                };
                ProductWithCategory {
                    product: Product {
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
                    },
                    category,
                }
            })
            .collect())
    }

    /// Create a product. Name and unit are required; everything else
    /// defaults to zero.
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        let name = required_text(input.name.as_deref()).ok_or(AppError::NameUnitRequired)?;
        let unit = required_text(input.unit.as_deref()).ok_or(AppError::NameUnitRequired)?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, category_id, unit, cost_price, sale_price, stock_qty, min_stock_qty)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, category_id, unit, cost_price, sale_price, stock_qty,
                      min_stock_qty, is_active, created_at
            "#,
        )
        .bind(name)
        .bind(input.category_id)
        .bind(unit)
        .bind(input.cost_price.unwrap_or(Decimal::ZERO))
        .bind(input.sale_price.unwrap_or(Decimal::ZERO))
        .bind(input.stock_qty.unwrap_or(Decimal::ZERO))
        .bind(input.min_stock_qty.unwrap_or(Decimal::ZERO))
        .fetch_one(&self.db)
        .await?;

        Ok(Product::from(row))
    }

    /// Apply a partial update to a product.
    pub async fn update_product(
        &self,
        product_id: i64,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category_id, unit, cost_price, sale_price, stock_qty,
                   min_stock_qty, is_active, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, category_id = $2, unit = $3, cost_price = $4,
                sale_price = $5, stock_qty = $6, min_stock_qty = $7, is_active = $8
            WHERE id = $9
            RETURNING id, name, category_id, unit, cost_price, sale_price, stock_qty,
                      min_stock_qty, is_active, created_at
            "#,
        )
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.category_id.or(existing.category_id))
        .bind(input.unit.unwrap_or(existing.unit))
        .bind(input.cost_price.unwrap_or(existing.cost_price))
        .bind(input.sale_price.unwrap_or(existing.sale_price))
        .bind(input.stock_qty.unwrap_or(existing.stock_qty))
        .bind(input.min_stock_qty.unwrap_or(existing.min_stock_qty))
        .bind(input.is_active.unwrap_or(existing.is_active))
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(Product::from(row))
    }

    /// Soft-delete a product (excluded from the catalog and from sale
    /// eligibility, kept for history).
    pub async fn delete_product(&self, product_id: i64) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET is_active = FALSE
            WHERE id = $1
            RETURNING id, name, category_id, unit, cost_price, sale_price, stock_qty,
                      min_stock_qty, is_active, created_at
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(Product::from(row))
    }
}

/// Trimmed non-empty text, or None
fn required_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_missing_and_blank() {
        assert_eq!(required_text(None), None);
        assert_eq!(required_text(Some("")), None);
        assert_eq!(required_text(Some("   ")), None);
        assert_eq!(required_text(Some("  Paint ")), Some("Paint"));
    }
}
