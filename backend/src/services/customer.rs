//! Customer registry service

use serde::Deserialize;
use sqlx::PgPool;

use shared::models::Customer;

use crate::error::{AppError, AppResult};
use crate::models::CustomerRow;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Filters for listing customers
#[derive(Debug, Deserialize)]
pub struct CustomerListQuery {
    pub search: Option<String>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List customers, optionally filtered on name or phone, name ascending.
    pub async fn list_customers(&self, query: &CustomerListQuery) -> AppResult<Vec<Customer>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, full_name, phone, address, created_at
            FROM customers
            WHERE ($1::text IS NULL
                   OR full_name ILIKE '%' || $1 || '%'
                   OR phone LIKE '%' || $1 || '%')
            ORDER BY full_name ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Create a customer. Full name and phone are required.
    pub async fn create_customer(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        let full_name = input
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AppError::NamePhoneRequired)?;
        let phone = input
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AppError::NamePhoneRequired)?;

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (full_name, phone, address)
            VALUES ($1, $2, $3)
            RETURNING id, full_name, phone, address, created_at
            "#,
        )
        .bind(full_name)
        .bind(phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(Customer::from(row))
    }
}
