//! Product catalog endpoint.

use axum::{Json, extract::State};

use crate::db;
use crate::error::AppError;
use crate::models::Product;
use crate::state::AppState;

/// `GET /api/products` - list the full catalog, ordered by name.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = db::products::list_all(state.pool()).await?;
    Ok(Json(products))
}
