//! Stock-in purchases

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchase header. `total_cost` is the sum of its lines at their
/// purchase-time cost prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub supplier_id: Option<i64>,
    pub note: Option<String>,
    pub total_cost: Decimal,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// One received line of a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    pub qty: Decimal,
    pub cost_price: Decimal,
}

/// Total cost of a purchase across its lines.
pub fn purchase_total(lines: &[(Decimal, Decimal)]) -> Decimal {
    lines.iter().map(|(qty, cost)| qty * cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn purchase_total_sums_lines() {
        let lines = [(dec!(10), dec!(700)), (dec!(2.5), dec!(1200))];
        assert_eq!(purchase_total(&lines), dec!(10000.0));
    }

    #[test]
    fn purchase_total_of_nothing_is_zero() {
        assert_eq!(purchase_total(&[]), Decimal::ZERO);
    }
}
