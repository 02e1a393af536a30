//! Closed enum sets used across the platform

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a stored or user-supplied label is outside a closed set
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// How a sale is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Cash,
    Card,
    Mixed,
    Credit,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Card => "card",
            PaymentType::Mixed => "mixed",
            PaymentType::Credit => "credit",
        }
    }
}

impl FromStr for PaymentType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentType::Cash),
            "card" => Ok(PaymentType::Card),
            "mixed" => Ok(PaymentType::Mixed),
            "credit" => Ok(PaymentType::Credit),
            other => Err(UnknownLabel {
                kind: "payment type",
                value: other.to_string(),
            }),
        }
    }
}

/// How a debt payment is settled (credit cannot pay off credit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            other => Err(UnknownLabel {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

/// Debt lifecycle: open until fully paid, then closed for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Open,
    Closed,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Open => "open",
            DebtStatus::Closed => "closed",
        }
    }
}

impl FromStr for DebtStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(DebtStatus::Open),
            "closed" => Ok(DebtStatus::Closed),
            other => Err(UnknownLabel {
                kind: "debt status",
                value: other.to_string(),
            }),
        }
    }
}

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Cashier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Cashier => "cashier",
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "cashier" => Ok(UserRole::Cashier),
            other => Err(UnknownLabel {
                kind: "user role",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_type_round_trip() {
        for s in ["cash", "card", "mixed", "credit"] {
            assert_eq!(s.parse::<PaymentType>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn payment_type_rejects_unknown() {
        assert!("wire".parse::<PaymentType>().is_err());
        assert!("".parse::<PaymentType>().is_err());
        // labels are case-sensitive, matching what is stored
        assert!("Cash".parse::<PaymentType>().is_err());
    }

    #[test]
    fn payment_method_excludes_credit() {
        assert!("credit".parse::<PaymentMethod>().is_err());
        assert!("mixed".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentType::Credit).unwrap(),
            "\"credit\""
        );
        assert_eq!(serde_json::to_string(&DebtStatus::Open).unwrap(), "\"open\"");
        assert_eq!(serde_json::to_string(&UserRole::Cashier).unwrap(), "\"cashier\"");
    }
}
