//! Debt ("nasiya") payment engine
//!
//! Applies one payment against an open debt and closes the debt in the same
//! transaction the moment the paid total reaches the debt total. Closed
//! debts accept no further payments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use shared::models::{is_settled, Customer, Debt, DebtPayment, Sale, User};
use shared::types::{DebtStatus, PaymentMethod};
use shared::validation::is_valid_amount;

use crate::error::{AppError, AppResult};
use crate::models::{CustomerRow, DebtPaymentRow, DebtRow, SaleRow, UserRow};

/// Debt service owning the payment transaction and debt listings
#[derive(Clone)]
pub struct DebtService {
    db: PgPool,
}

/// Input for applying a payment to a debt
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPaymentInput {
    pub amount: Option<Decimal>,
    pub payment_type: Option<String>,
}

/// Filters for listing debts
#[derive(Debug, Deserialize)]
pub struct DebtListQuery {
    pub status: Option<String>,
}

/// A sale together with its seller, as nested under a debt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithSeller {
    #[serde(flatten)]
    pub sale: Sale,
    pub seller: User,
}

/// The full debt graph returned to the cashier UI
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtWithDetails {
    #[serde(flatten)]
    pub debt: Debt,
    pub customer: Customer,
    pub sale: SaleWithSeller,
    pub payments: Vec<DebtPayment>,
}

/// Pre-transaction validation of a payment request.
pub(crate) fn validate_payment_input(
    input: &ApplyPaymentInput,
) -> AppResult<(Decimal, PaymentMethod)> {
    let amount = input
        .amount
        .filter(|a| is_valid_amount(*a))
        .ok_or(AppError::BadAmount)?;
    let method = input
        .payment_type
        .as_deref()
        .and_then(|s| s.parse::<PaymentMethod>().ok())
        .ok_or(AppError::BadPaymentType)?;
    Ok((amount, method))
}

impl DebtService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply one payment atomically. The closure check uses the
    /// post-increment paid total, so a payment that exactly meets or
    /// overshoots the balance closes the debt in the same transaction.
    pub async fn apply_payment(
        &self,
        debt_id: i64,
        actor_id: i64,
        input: ApplyPaymentInput,
    ) -> AppResult<DebtWithDetails> {
        let (amount, method) = validate_payment_input(&input)?;

        let mut tx = self.db.begin().await?;

        // Serialize concurrent payments on the same debt.
        let debt = sqlx::query_as::<_, DebtRow>(
            r#"
            SELECT id, customer_id, sale_id, debt_total, paid_total, status, created_at
            FROM debts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(debt_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::DebtNotFound)?;

        let status = debt
            .status
            .parse::<DebtStatus>()
            .map_err(anyhow::Error::new)?;
        if status == DebtStatus::Closed {
            return Err(AppError::DebtAlreadyClosed);
        }

        sqlx::query(
            "INSERT INTO debt_payments (debt_id, amount, payment_type, created_by) VALUES ($1, $2, $3, $4)",
        )
        .bind(debt_id)
        .bind(amount)
        .bind(method.as_str())
        .bind(actor_id)
        .execute(&mut *tx)
        .await?;

        let (paid_total, debt_total): (Decimal, Decimal) = sqlx::query_as(
            "UPDATE debts SET paid_total = paid_total + $1 WHERE id = $2 RETURNING paid_total, debt_total",
        )
        .bind(amount)
        .bind(debt_id)
        .fetch_one(&mut *tx)
        .await?;

        if is_settled(paid_total, debt_total) {
            sqlx::query("UPDATE debts SET status = $1 WHERE id = $2")
                .bind(DebtStatus::Closed.as_str())
                .bind(debt_id)
                .execute(&mut *tx)
                .await?;
        }

        let graph = fetch_debt_graph(&mut tx, debt_id).await?;

        tx.commit().await?;

        tracing::info!(debt_id, %amount, "debt payment applied");

        Ok(graph)
    }

    /// List debts newest first, optionally filtered by status. An
    /// unrecognized status filter is ignored.
    pub async fn list_debts(&self, query: &DebtListQuery) -> AppResult<Vec<DebtWithDetails>> {
        let status = query
            .status
            .as_deref()
            .and_then(|s| s.parse::<DebtStatus>().ok());

        let rows = sqlx::query_as::<_, DebtRow>(
            r#"
            SELECT id, customer_id, sale_id, debt_total, paid_total, status, created_at
            FROM debts
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        let mut conn = self.db.acquire().await?;
        let mut debts = Vec::with_capacity(rows.len());
        for row in rows {
            debts.push(assemble_debt(&mut *conn, row).await?);
        }
        Ok(debts)
    }
}

/// Re-read the full debt graph on the same connection that wrote it.
async fn fetch_debt_graph(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    debt_id: i64,
) -> AppResult<DebtWithDetails> {
    let row = sqlx::query_as::<_, DebtRow>(
        r#"
        SELECT id, customer_id, sale_id, debt_total, paid_total, status, created_at
        FROM debts
        WHERE id = $1
        "#,
    )
    .bind(debt_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(AppError::DebtNotFound)?;

    assemble_debt(&mut **tx, row).await
}

/// Build the response graph for one debt row.
async fn assemble_debt(conn: &mut PgConnection, row: DebtRow) -> AppResult<DebtWithDetails> {
    let customer_row = sqlx::query_as::<_, CustomerRow>(
        "SELECT id, full_name, phone, address, created_at FROM customers WHERE id = $1",
    )
    .bind(row.customer_id)
    .fetch_one(&mut *conn)
    .await?;

    let sale_row = sqlx::query_as::<_, SaleRow>(
        r#"
        SELECT id, receipt_no, seller_id, total, discount, payment_type,
               cash_amount, card_amount, customer_id, created_at
        FROM sales
        WHERE id = $1
        "#,
    )
    .bind(row.sale_id)
    .fetch_one(&mut *conn)
    .await?;

    let seller_row = sqlx::query_as::<_, UserRow>(
        "SELECT id, full_name, login, role, is_active, created_at FROM users WHERE id = $1",
    )
    .bind(sale_row.seller_id)
    .fetch_one(&mut *conn)
    .await?;

    let payment_rows = sqlx::query_as::<_, DebtPaymentRow>(
        "SELECT id, debt_id, amount, payment_type, created_by, created_at FROM debt_payments WHERE debt_id = $1 ORDER BY created_at",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    let payments = payment_rows
        .into_iter()
        .map(DebtPayment::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DebtWithDetails {
        debt: Debt::try_from(row)?,
        customer: Customer::from(customer_row),
        sale: SaleWithSeller {
            sale: Sale::try_from(sale_row)?,
            seller: User::try_from(seller_row)?,
        },
        payments,
    })
}
