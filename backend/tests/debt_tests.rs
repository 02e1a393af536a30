//! Debt payment tests
//!
//! Pure-logic and property-based coverage of the debt invariants:
//! - paid_total equals the sum of accepted payments
//! - status is closed exactly when paid_total >= debt_total
//! - a closed debt accepts no further payments and never reopens

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use shared::models::is_settled;

// ============================================================================
// Payment simulation (mirrors the transaction body: reject closed debts,
// append the payment, increment the paid total, close on the post-increment
// value)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Open,
    Closed,
}

#[derive(Debug)]
struct DebtAccount {
    debt_total: Decimal,
    paid_total: Decimal,
    status: Status,
    payments: Vec<Decimal>,
}

#[derive(Debug, PartialEq, Eq)]
enum PaymentOutcome {
    Accepted,
    Rejected(&'static str),
}

impl DebtAccount {
    fn new(debt_total: Decimal) -> Self {
        Self {
            debt_total,
            paid_total: Decimal::ZERO,
            status: Status::Open,
            payments: Vec::new(),
        }
    }

    fn pay(&mut self, amount: Decimal) -> PaymentOutcome {
        if amount <= Decimal::ZERO {
            return PaymentOutcome::Rejected("BAD_AMOUNT");
        }
        if self.status == Status::Closed {
            return PaymentOutcome::Rejected("DEBT_ALREADY_CLOSED");
        }

        self.payments.push(amount);
        self.paid_total += amount;

        if is_settled(self.paid_total, self.debt_total) {
            self.status = Status::Closed;
        }

        PaymentOutcome::Accepted
    }
}

// ============================================================================
// Scenario tests
// ============================================================================

/// A debt created by a credit sale starts open with nothing paid
#[test]
fn new_debt_starts_open_and_unpaid() {
    let debt = DebtAccount::new(dec!(5000));
    assert_eq!(debt.debt_total, dec!(5000));
    assert_eq!(debt.paid_total, Decimal::ZERO);
    assert_eq!(debt.status, Status::Open);
    assert!(debt.payments.is_empty());
}

/// Scenario 4: an exact payment closes the debt; the next payment bounces
#[test]
fn exact_payment_closes_and_blocks_further_payments() {
    let mut debt = DebtAccount::new(dec!(5000));

    assert_eq!(debt.pay(dec!(5000)), PaymentOutcome::Accepted);
    assert_eq!(debt.paid_total, dec!(5000));
    assert_eq!(debt.status, Status::Closed);

    assert_eq!(
        debt.pay(dec!(100)),
        PaymentOutcome::Rejected("DEBT_ALREADY_CLOSED")
    );
    assert_eq!(debt.paid_total, dec!(5000));
    assert_eq!(debt.payments.len(), 1);
}

#[test]
fn partial_payments_keep_the_debt_open() {
    let mut debt = DebtAccount::new(dec!(5000));

    assert_eq!(debt.pay(dec!(2000)), PaymentOutcome::Accepted);
    assert_eq!(debt.status, Status::Open);
    assert_eq!(debt.pay(dec!(2999)), PaymentOutcome::Accepted);
    assert_eq!(debt.status, Status::Open);
    assert_eq!(debt.paid_total, dec!(4999));
}

/// Overpayment is recorded at face value and still closes the debt
#[test]
fn overpayment_is_recorded_in_full() {
    let mut debt = DebtAccount::new(dec!(5000));

    assert_eq!(debt.pay(dec!(7000)), PaymentOutcome::Accepted);
    assert_eq!(debt.paid_total, dec!(7000));
    assert_eq!(debt.status, Status::Closed);
}

#[test]
fn non_positive_amounts_are_rejected_without_effect() {
    let mut debt = DebtAccount::new(dec!(5000));

    assert_eq!(debt.pay(Decimal::ZERO), PaymentOutcome::Rejected("BAD_AMOUNT"));
    assert_eq!(debt.pay(dec!(-50)), PaymentOutcome::Rejected("BAD_AMOUNT"));
    assert_eq!(debt.paid_total, Decimal::ZERO);
    assert!(debt.payments.is_empty());
    assert_eq!(debt.status, Status::Open);
}

// ============================================================================
// Property-based tests
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// paid_total is exactly the sum of accepted payments, and closure
    /// tracks the settle condition after every step.
    #[test]
    fn prop_paid_total_is_sum_of_accepted(
        debt_total in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 1..30)
    ) {
        let mut debt = DebtAccount::new(debt_total);

        let mut accepted_sum = Decimal::ZERO;
        for amount in amounts {
            if debt.pay(amount) == PaymentOutcome::Accepted {
                accepted_sum += amount;
            }

            // The invariant holds at every intermediate state.
            prop_assert_eq!(debt.paid_total, accepted_sum);
            prop_assert_eq!(
                debt.status == Status::Closed,
                is_settled(debt.paid_total, debt.debt_total)
            );
        }
    }

    /// Once closed, a debt stays closed and its totals freeze.
    #[test]
    fn prop_closed_is_terminal(
        debt_total in amount_strategy(),
        tail in prop::collection::vec(amount_strategy(), 1..10)
    ) {
        let mut debt = DebtAccount::new(debt_total);

        // Close it with one covering payment.
        prop_assert_eq!(debt.pay(debt_total), PaymentOutcome::Accepted);
        let frozen_paid = debt.paid_total;

        for amount in tail {
            prop_assert_eq!(
                debt.pay(amount),
                PaymentOutcome::Rejected("DEBT_ALREADY_CLOSED")
            );
            prop_assert_eq!(debt.paid_total, frozen_paid);
            prop_assert_eq!(debt.status, Status::Closed);
        }
    }

    /// A debt never closes while the paid total is short of the debt total.
    #[test]
    fn prop_never_closes_early(
        debt_total in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 1..30)
    ) {
        let mut debt = DebtAccount::new(debt_total);

        for amount in amounts {
            debt.pay(amount);
            if debt.paid_total < debt.debt_total {
                prop_assert_eq!(debt.status, Status::Open);
            }
        }
    }
}
