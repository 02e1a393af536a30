//! Sales and sale items, plus the money arithmetic of the checkout

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::PaymentType;

/// A committed sale. Immutable once created; `receipt_no` is unique and
/// strictly increasing in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub receipt_no: i64,
    /// Identity of the authenticated cashier, never client-supplied
    pub seller_id: i64,
    /// Post-discount total, never negative
    pub total: Decimal,
    pub discount: Decimal,
    pub payment_type: PaymentType,
    /// Cash leg of a mixed sale, 0 otherwise
    pub cash_amount: Decimal,
    /// Card leg of a mixed sale, 0 otherwise
    pub card_amount: Decimal,
    /// Set only for credit sales
    pub customer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// One line of a sale. `sale_price` is a snapshot of the product price at
/// transaction time and is deliberately decoupled from later price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub qty: Decimal,
    pub sale_price: Decimal,
}

/// Line total for one cart position.
pub fn line_total(qty: Decimal, sale_price: Decimal) -> Decimal {
    qty * sale_price
}

/// Final sale total: the discount is subtracted from the raw total but can
/// never drive it negative. A discount larger than the raw total is absorbed
/// silently.
pub fn apply_discount(raw_total: Decimal, discount: Decimal) -> Decimal {
    (raw_total - discount).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies() {
        assert_eq!(line_total(dec!(2), dec!(1000)), dec!(2000));
        assert_eq!(line_total(dec!(0.5), dec!(9000)), dec!(4500.0));
    }

    #[test]
    fn discount_is_subtracted() {
        assert_eq!(apply_discount(dec!(2000), dec!(500)), dec!(1500));
        assert_eq!(apply_discount(dec!(2000), Decimal::ZERO), dec!(2000));
    }

    #[test]
    fn discount_never_drives_total_negative() {
        assert_eq!(apply_discount(dec!(1000), dec!(1500)), Decimal::ZERO);
        assert_eq!(apply_discount(dec!(1000), dec!(1000)), Decimal::ZERO);
    }

    #[test]
    fn sale_serializes_camel_case() {
        let sale = Sale {
            id: 1,
            receipt_no: 42,
            seller_id: 3,
            total: dec!(2000),
            discount: Decimal::ZERO,
            payment_type: crate::types::PaymentType::Cash,
            cash_amount: Decimal::ZERO,
            card_amount: Decimal::ZERO,
            customer_id: None,
            created_at: chrono::Utc::now(),
        };
        let value = serde_json::to_value(&sale).unwrap();
        assert_eq!(value["receiptNo"], 42);
        assert_eq!(value["paymentType"], "cash");
        assert!(value["customerId"].is_null());
    }
}
