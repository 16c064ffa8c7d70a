//! HTTP route handlers.

pub mod orders;
pub mod products;
pub mod reports;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports", get(reports::get_report))
        .route("/api/reports/download", get(reports::download_report))
        .route("/api/orders", get(orders::list_orders))
        .route("/api/products", get(products::list_products))
}
