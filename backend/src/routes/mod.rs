//! Route definitions for the retail POS backend

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (login public, /me protected)
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/products", product_routes())
        .nest("/purchases", purchase_routes())
        .nest("/sales", sale_routes())
        .nest("/customers", customer_routes())
        .nest("/debts", debt_routes())
        .nest("/reports", report_routes())
}

/// Authentication routes. `route_layer` only wraps the routes added before
/// it, so /login stays public.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware))
        .route("/login", post(handlers::login))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            patch(handlers::update_product).delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sale routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Debt routes (protected)
fn debt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_debts))
        .route("/:debt_id/payments", post(handlers::create_debt_payment))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(handlers::daily_report))
        .route_layer(middleware::from_fn(auth_middleware))
}
