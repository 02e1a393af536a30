//! Error handling for the retail POS backend
//!
//! Every failure the API can report is a variant here; the boundary layer
//! maps each variant to a stable `{"error": "<CODE>"}` response without
//! string-matching. Storage and internal errors are logged and masked.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("bearer token required")]
    TokenRequired,

    #[error("bearer token invalid or expired")]
    TokenInvalid,

    #[error("no authenticated user on request")]
    NoAuthUser,

    #[error("role not allowed")]
    Forbidden,

    #[error("login and password required")]
    LoginPasswordRequired,

    #[error("bad credentials")]
    BadCredentials,

    // Sale validation errors
    #[error("payment type required")]
    PaymentTypeRequired,

    #[error("payment type invalid")]
    PaymentTypeInvalid,

    #[error("items required")]
    ItemsRequired,

    #[error("credit sale requires a customer")]
    CustomerRequiredForCredit,

    #[error("mixed payment requires a cash or card amount")]
    MixedRequiresCashOrCard,

    #[error("discount invalid")]
    DiscountInvalid,

    #[error("product id invalid")]
    ProductIdInvalid,

    #[error("qty invalid")]
    QtyInvalid,

    #[error("product not found or inactive")]
    ProductNotFound,

    #[error("not enough stock for {product_name}: have {stock}, requested {requested}")]
    StockNotEnough {
        product_name: String,
        stock: Decimal,
        requested: Decimal,
    },

    // Debt payment errors
    #[error("payment amount invalid")]
    BadAmount,

    #[error("debt payment type invalid")]
    BadPaymentType,

    #[error("debt not found")]
    DebtNotFound,

    #[error("debt already closed")]
    DebtAlreadyClosed,

    // CRUD validation errors
    #[error("name and unit required")]
    NameUnitRequired,

    #[error("name and phone required")]
    NamePhoneRequired,

    #[error("{0} not found")]
    NotFound(String),

    // Database errors
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable client-facing error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::TokenRequired => "TOKEN_REQUIRED",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::NoAuthUser => "NO_AUTH_USER",
            AppError::Forbidden => "FORBIDDEN",
            AppError::LoginPasswordRequired => "LOGIN_PASSWORD_REQUIRED",
            AppError::BadCredentials => "BAD_CREDENTIALS",
            AppError::PaymentTypeRequired => "PAYMENT_TYPE_REQUIRED",
            AppError::PaymentTypeInvalid => "PAYMENT_TYPE_INVALID",
            AppError::ItemsRequired => "ITEMS_REQUIRED",
            AppError::CustomerRequiredForCredit => "CUSTOMER_REQUIRED_FOR_CREDIT",
            AppError::MixedRequiresCashOrCard => "MIXED_REQUIRES_CASH_OR_CARD",
            AppError::DiscountInvalid => "DISCOUNT_INVALID",
            AppError::ProductIdInvalid => "PRODUCT_ID_INVALID",
            AppError::QtyInvalid => "QTY_INVALID",
            AppError::ProductNotFound => "PRODUCT_NOT_FOUND",
            AppError::StockNotEnough { .. } => "STOCK_NOT_ENOUGH",
            AppError::BadAmount => "BAD_AMOUNT",
            AppError::BadPaymentType => "BAD_PAYMENT_TYPE",
            AppError::DebtNotFound => "DEBT_NOT_FOUND",
            AppError::DebtAlreadyClosed => "DEBT_ALREADY_CLOSED",
            AppError::NameUnitRequired => "NAME_UNIT_REQUIRED",
            AppError::NamePhoneRequired => "NAME_PHONE_REQUIRED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Database(_) | AppError::Internal(_) => "SERVER_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::TokenRequired
            | AppError::TokenInvalid
            | AppError::NoAuthUser
            | AppError::BadCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DebtNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response structure: `{"error": "<CODE>"}` plus optional metadata
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<StockMeta>,
}

/// Diagnostic metadata attached to STOCK_NOT_ENOUGH
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMeta {
    pub product_name: String,
    pub stock: Decimal,
    pub requested: Decimal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::warn!(code = self.code(), "request rejected: {}", self);
        }

        let meta = match &self {
            AppError::StockNotEnough {
                product_name,
                stock,
                requested,
            } => Some(StockMeta {
                product_name: product_name.clone(),
                stock: *stock,
                requested: *requested,
            }),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            meta,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn stock_error_carries_meta() {
        let err = AppError::StockNotEnough {
            product_name: "Cement (50kg)".to_string(),
            stock: dec!(1),
            requested: dec!(2),
        };
        assert_eq!(err.code(), "STOCK_NOT_ENOUGH");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn server_errors_share_an_opaque_code() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.code(), "SERVER_ERROR");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn debt_not_found_is_404() {
        assert_eq!(AppError::DebtNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DebtAlreadyClosed.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_shape_is_code_plus_optional_meta() {
        let plain = serde_json::to_value(ErrorResponse {
            error: "QTY_INVALID".to_string(),
            meta: None,
        })
        .unwrap();
        assert_eq!(plain, serde_json::json!({"error": "QTY_INVALID"}));

        let with_meta = serde_json::to_value(ErrorResponse {
            error: "STOCK_NOT_ENOUGH".to_string(),
            meta: Some(StockMeta {
                product_name: "Cement (50kg)".to_string(),
                stock: dec!(1),
                requested: dec!(2),
            }),
        })
        .unwrap();
        assert_eq!(with_meta["meta"]["productName"], "Cement (50kg)");
        assert_eq!(with_meta["meta"]["stock"], serde_json::json!("1"));
    }
}
