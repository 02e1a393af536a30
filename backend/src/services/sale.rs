//! Sale transaction engine
//!
//! The heart of the system: one sale is validated against live stock,
//! priced from the catalog, stamped with the next receipt number, and
//! committed together with its stock decrements and (for credit sales) its
//! debt record — all inside a single transaction. Any failure rolls the
//! whole sale back; no partial writes survive.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use shared::models::{apply_discount, line_total, Customer, Debt, Product, Sale, SaleItem, User};
use shared::types::PaymentType;
use shared::validation::{is_valid_discount, is_valid_product_id, is_valid_qty};

use crate::error::{AppError, AppResult};
use crate::models::{CustomerRow, DebtRow, ProductRow, SaleItemRow, SaleRow, UserRow};

/// Counter key backing the receipt sequence
const RECEIPT_COUNTER_KEY: &str = "receipt_no";

/// Sale service owning the sale transaction and sale listings
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Input for creating a sale. Prices are never part of the request; the
/// catalog is the only price source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub payment_type: Option<String>,
    pub discount: Option<Decimal>,
    pub cash_amount: Option<Decimal>,
    pub card_amount: Option<Decimal>,
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<SaleItemInput>,
}

/// One cart position
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: i64,
    pub qty: Decimal,
}

/// Filters for listing sales
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub payment_type: Option<String>,
}

/// A sale item together with its product, as printed on receipts
#[derive(Debug, Serialize)]
pub struct SaleItemWithProduct {
    #[serde(flatten)]
    pub item: SaleItem,
    pub product: Product,
}

/// The full sale graph returned to the cashier UI
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithDetails {
    #[serde(flatten)]
    pub sale: Sale,
    pub seller: User,
    pub customer: Option<Customer>,
    pub items: Vec<SaleItemWithProduct>,
    pub debt: Option<Debt>,
}

/// Input after the pre-transaction checks: payment type resolved, amounts
/// normalized for the payment type.
#[derive(Debug, PartialEq)]
pub(crate) struct ValidatedSale {
    pub(crate) payment_type: PaymentType,
    pub(crate) discount: Decimal,
    pub(crate) cash_amount: Decimal,
    pub(crate) card_amount: Decimal,
    pub(crate) customer_id: Option<i64>,
}

/// One validated cart line with its price snapshot
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SaleLine {
    pub(crate) product_id: i64,
    pub(crate) qty: Decimal,
    pub(crate) sale_price: Decimal,
}

/// Pre-transaction input validation. Each rejection is a distinct error
/// code so the cashier UI can show a precise message.
pub(crate) fn validate_input(input: &CreateSaleInput) -> AppResult<ValidatedSale> {
    let label = input
        .payment_type
        .as_deref()
        .ok_or(AppError::PaymentTypeRequired)?;
    let payment_type = label
        .parse::<PaymentType>()
        .map_err(|_| AppError::PaymentTypeInvalid)?;

    if input.items.is_empty() {
        return Err(AppError::ItemsRequired);
    }

    let customer_id = if payment_type == PaymentType::Credit {
        match input.customer_id {
            Some(id) if id > 0 => Some(id),
            _ => return Err(AppError::CustomerRequiredForCredit),
        }
    } else {
        // Ignored for non-credit sales even if supplied
        None
    };

    let (cash_amount, card_amount) = if payment_type == PaymentType::Mixed {
        let cash = input.cash_amount.unwrap_or(Decimal::ZERO);
        let card = input.card_amount.unwrap_or(Decimal::ZERO);
        if cash <= Decimal::ZERO && card <= Decimal::ZERO {
            return Err(AppError::MixedRequiresCashOrCard);
        }
        (cash, card)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let discount = input.discount.unwrap_or(Decimal::ZERO);
    if !is_valid_discount(discount) {
        return Err(AppError::DiscountInvalid);
    }

    Ok(ValidatedSale {
        payment_type,
        discount,
        cash_amount,
        card_amount,
        customer_id,
    })
}

/// Validates cart lines against the locked product rows, in the order
/// product id, qty, existence, stock. The first failing line rejects the
/// whole cart.
pub(crate) fn check_items(
    items: &[SaleItemInput],
    products: &HashMap<i64, ProductRow>,
) -> AppResult<Vec<SaleLine>> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if !is_valid_product_id(item.product_id) {
            return Err(AppError::ProductIdInvalid);
        }
        if !is_valid_qty(item.qty) {
            return Err(AppError::QtyInvalid);
        }
        let product = products
            .get(&item.product_id)
            .ok_or(AppError::ProductNotFound)?;
        if item.qty > product.stock_qty {
            return Err(AppError::StockNotEnough {
                product_name: product.name.clone(),
                stock: product.stock_qty,
                requested: item.qty,
            });
        }
        lines.push(SaleLine {
            product_id: item.product_id,
            qty: item.qty,
            sale_price: product.sale_price,
        });
    }
    Ok(lines)
}

/// Cart total before discount, from the snapshotted prices
pub(crate) fn raw_total(lines: &[SaleLine]) -> Decimal {
    lines.iter().map(|l| line_total(l.qty, l.sale_price)).sum()
}

impl SaleService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create one sale atomically. Seller identity comes from the
    /// authenticated actor, never from the request body.
    pub async fn create_sale(
        &self,
        seller_id: i64,
        input: CreateSaleInput,
    ) -> AppResult<SaleWithDetails> {
        let validated = validate_input(&input)?;

        let mut tx = self.db.begin().await?;

        // Lock the referenced products for the rest of the transaction.
        // The stock check and the later decrement must be serialized per
        // product row, or two concurrent sales could both pass the check.
        let product_ids: Vec<i64> = input.items.iter().map(|it| it.product_id).collect();
        let products = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category_id, unit, cost_price, sale_price, stock_qty,
                   min_stock_qty, is_active, created_at
            FROM products
            WHERE id = ANY($1) AND is_active = TRUE
            FOR UPDATE
            "#,
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;

        let by_id: HashMap<i64, ProductRow> =
            products.into_iter().map(|p| (p.id, p)).collect();

        let lines = check_items(&input.items, &by_id)?;
        let total = apply_discount(raw_total(&lines), validated.discount);

        let receipt_no = next_receipt_no(&mut tx).await?;

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (receipt_no, seller_id, total, discount, payment_type,
                               cash_amount, card_amount, customer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(receipt_no)
        .bind(seller_id)
        .bind(total)
        .bind(validated.discount)
        .bind(validated.payment_type.as_str())
        .bind(validated.cash_amount)
        .bind(validated.card_amount)
        .bind(validated.customer_id)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO sale_items (sale_id, product_id, qty, sale_price) VALUES ($1, $2, $3, $4)",
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.qty)
            .bind(line.sale_price)
            .execute(&mut *tx)
            .await?;

            // The stock floor is re-stated in the decrement itself; with the
            // rows locked above this cannot fail, but the guard keeps the
            // invariant local to the write.
            let updated = sqlx::query(
                "UPDATE products SET stock_qty = stock_qty - $1 WHERE id = $2 AND stock_qty >= $1",
            )
            .bind(line.qty)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                let (product_name, stock) = by_id
                    .get(&line.product_id)
                    .map(|p| (p.name.clone(), p.stock_qty))
                    .unwrap_or_default();
                return Err(AppError::StockNotEnough {
                    product_name,
                    stock,
                    requested: line.qty,
                });
            }
        }

        if validated.payment_type == PaymentType::Credit {
            sqlx::query(
                "INSERT INTO debts (customer_id, sale_id, debt_total, paid_total, status) VALUES ($1, $2, $3, 0, 'open')",
            )
            .bind(validated.customer_id)
            .bind(sale_id)
            .bind(total)
            .execute(&mut *tx)
            .await?;
        }

        let sale = fetch_sale_graph(&mut tx, sale_id).await?;

        tx.commit().await?;

        tracing::info!(sale_id, receipt_no, %total, "sale committed");

        Ok(sale)
    }

    /// List sales newest first, optionally filtered by an inclusive date
    /// range and a payment type. An unrecognized payment type filter is
    /// ignored rather than rejected.
    pub async fn list_sales(&self, query: &SaleListQuery) -> AppResult<Vec<SaleWithDetails>> {
        let from = query.from.map(day_start_utc);
        let to = query
            .to
            .map(|d| day_start_utc(d) + chrono::Duration::days(1));
        let payment_type = query
            .payment_type
            .as_deref()
            .and_then(|s| s.parse::<PaymentType>().ok());

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, receipt_no, seller_id, total, discount, payment_type,
                   cash_amount, card_amount, customer_id, created_at
            FROM sales
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at < $2)
              AND ($3::text IS NULL OR payment_type = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(payment_type.map(|p| p.as_str()))
        .fetch_all(&self.db)
        .await?;

        let mut conn = self.db.acquire().await?;
        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            sales.push(assemble_sale(&mut *conn, row).await?);
        }
        Ok(sales)
    }
}

/// Midnight UTC for a calendar day
fn day_start_utc(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Allocate the next receipt number. Must be called inside an open
/// transaction: the upsert-increment takes a row lock on the counter, so
/// two concurrent sales can never claim the same number. A rolled-back
/// sale wastes its number; duplicates are impossible.
pub(crate) async fn next_receipt_no(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> AppResult<i64> {
    let value = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO counters (key, value)
        VALUES ($1, 1)
        ON CONFLICT (key) DO UPDATE SET value = counters.value + 1
        RETURNING value
        "#,
    )
    .bind(RECEIPT_COUNTER_KEY)
    .fetch_one(&mut **tx)
    .await?;
    Ok(value)
}

/// Re-read the full sale graph (seller, customer, items with products,
/// debt) on the same connection that wrote it.
async fn fetch_sale_graph(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    sale_id: i64,
) -> AppResult<SaleWithDetails> {
    let row = sqlx::query_as::<_, SaleRow>(
        r#"
        SELECT id, receipt_no, seller_id, total, discount, payment_type,
               cash_amount, card_amount, customer_id, created_at
        FROM sales
        WHERE id = $1
        "#,
    )
    .bind(sale_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

    assemble_sale(&mut **tx, row).await
}

/// Build the response graph for one sale row.
async fn assemble_sale(
    conn: &mut PgConnection,
    row: SaleRow,
) -> AppResult<SaleWithDetails> {
    let seller_row = sqlx::query_as::<_, UserRow>(
        "SELECT id, full_name, login, role, is_active, created_at FROM users WHERE id = $1",
    )
    .bind(row.seller_id)
    .fetch_one(&mut *conn)
    .await?;
    let seller = User::try_from(seller_row)?;

    let customer = match row.customer_id {
        Some(customer_id) => sqlx::query_as::<_, CustomerRow>(
            "SELECT id, full_name, phone, address, created_at FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?
        .map(Customer::from),
        None => None,
    };

    let item_rows = sqlx::query_as::<_, SaleItemRow>(
        "SELECT id, sale_id, product_id, qty, sale_price FROM sale_items WHERE sale_id = $1 ORDER BY id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
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
        .fetch_one(&mut *conn)
        .await?;
        items.push(SaleItemWithProduct {
            item: SaleItem::from(item_row),
            product: Product::from(product_row),
        });
    }

    let debt = sqlx::query_as::<_, DebtRow>(
        "SELECT id, customer_id, sale_id, debt_total, paid_total, status, created_at FROM debts WHERE sale_id = $1",
    )
    .bind(row.id)
    .fetch_optional(&mut *conn)
    .await?
    .map(Debt::try_from)
    .transpose()?;

    Ok(SaleWithDetails {
        sale: Sale::try_from(row)?,
        seller,
        customer,
        items,
        debt,
    })
}
