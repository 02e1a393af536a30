//! Business logic services for the retail POS backend

pub mod auth;
pub mod customer;
pub mod debt;
pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use debt::DebtService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use report::ReportService;
pub use sale::SaleService;
