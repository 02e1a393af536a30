//! Daily sales report
//!
//! One aggregate per calendar day: total takings, the cash/card/credit
//! split, and the sale count. Mixed sales contribute their cash and card
//! legs to the respective buckets.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use shared::types::PaymentType;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Query parameters for the daily report
#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<NaiveDate>,
}

/// Aggregate of one day's sales
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total: Decimal,
    pub cash: Decimal,
    pub card: Decimal,
    pub credit: Decimal,
    pub count: i64,
}

/// The slice of a sale row the aggregation needs
#[derive(Debug, FromRow)]
pub(crate) struct DailySaleRow {
    pub(crate) total: Decimal,
    pub(crate) payment_type: String,
    pub(crate) cash_amount: Decimal,
    pub(crate) card_amount: Decimal,
}

/// Fold one day's sales into the report buckets.
pub(crate) fn aggregate_daily(date: NaiveDate, rows: &[DailySaleRow]) -> AppResult<DailyReport> {
    let mut total = Decimal::ZERO;
    let mut cash = Decimal::ZERO;
    let mut card = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for row in rows {
        let payment_type = row
            .payment_type
            .parse::<PaymentType>()
            .map_err(anyhow::Error::new)?;

        total += row.total;
        match payment_type {
            PaymentType::Cash => cash += row.total,
            PaymentType::Card => card += row.total,
            PaymentType::Mixed => {
                cash += row.cash_amount;
                card += row.card_amount;
            }
            PaymentType::Credit => credit += row.total,
        }
    }

    Ok(DailyReport {
        date,
        total,
        cash,
        card,
        credit,
        count: rows.len() as i64,
    })
}

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Aggregate the sales of one calendar day (UTC); defaults to today.
    pub async fn daily(&self, date: Option<NaiveDate>) -> AppResult<DailyReport> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start + chrono::Duration::days(1);

        let rows = sqlx::query_as::<_, DailySaleRow>(
            r#"
            SELECT total, payment_type, cash_amount, card_amount
            FROM sales
            WHERE created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        aggregate_daily(date, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(total: Decimal, payment_type: &str, cash: Decimal, card: Decimal) -> DailySaleRow {
        DailySaleRow {
            total,
            payment_type: payment_type.to_string(),
            cash_amount: cash,
            card_amount: card,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    #[test]
    fn empty_day_is_all_zeros() {
        let report = aggregate_daily(day(), &[]).unwrap();
        assert_eq!(report.total, Decimal::ZERO);
        assert_eq!(report.count, 0);
    }

    #[test]
    fn buckets_split_by_payment_type() {
        let rows = vec![
            row(dec!(2000), "cash", Decimal::ZERO, Decimal::ZERO),
            row(dec!(3000), "card", Decimal::ZERO, Decimal::ZERO),
            row(dec!(5000), "credit", Decimal::ZERO, Decimal::ZERO),
        ];
        let report = aggregate_daily(day(), &rows).unwrap();
        assert_eq!(report.total, dec!(10000));
        assert_eq!(report.cash, dec!(2000));
        assert_eq!(report.card, dec!(3000));
        assert_eq!(report.credit, dec!(5000));
        assert_eq!(report.count, 3);
    }

    #[test]
    fn mixed_sales_split_into_cash_and_card() {
        let rows = vec![row(dec!(7000), "mixed", dec!(4000), dec!(3000))];
        let report = aggregate_daily(day(), &rows).unwrap();
        assert_eq!(report.total, dec!(7000));
        assert_eq!(report.cash, dec!(4000));
        assert_eq!(report.card, dec!(3000));
        assert_eq!(report.credit, Decimal::ZERO);
    }

    #[test]
    fn unknown_payment_type_is_an_internal_error() {
        let rows = vec![row(dec!(100), "barter", Decimal::ZERO, Decimal::ZERO)];
        assert!(aggregate_daily(day(), &rows).is_err());
    }
}
