//! Customer debts ("nasiya") and their payments

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DebtStatus, PaymentMethod};

/// A debt created by a credit sale, 1:1 with that sale. `debt_total` is
/// fixed at creation; `paid_total` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: i64,
    pub customer_id: i64,
    pub sale_id: i64,
    pub debt_total: Decimal,
    pub paid_total: Decimal,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
}

/// One payment against a debt. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayment {
    pub id: i64,
    pub debt_id: i64,
    pub amount: Decimal,
    pub payment_type: PaymentMethod,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// A debt closes the moment the paid total reaches the debt total.
/// Overpayment is recorded at face value and still settles the debt.
pub fn is_settled(paid_total: Decimal, debt_total: Decimal) -> bool {
    paid_total >= debt_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn exact_payment_settles() {
        assert!(is_settled(dec!(5000), dec!(5000)));
    }

    #[test]
    fn overpayment_settles() {
        assert!(is_settled(dec!(5100), dec!(5000)));
    }

    #[test]
    fn partial_payment_does_not_settle() {
        assert!(!is_settled(dec!(4999.99), dec!(5000)));
        assert!(!is_settled(Decimal::ZERO, dec!(5000)));
    }
}
