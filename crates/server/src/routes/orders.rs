//! Order listing endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tirta_core::{OrderId, OrderStatus, Rupiah};

use crate::db;
use crate::error::AppError;
use crate::models::Order;
use crate::reports::line_items;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub limit: Option<i64>,
}

/// Order summary view for listings. The raw `items` JSON is folded into
/// counts and totals rather than echoed to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
    /// Units across parseable line items.
    pub total_items: i64,
    /// Invoice total when one was issued, otherwise the line-item sum.
    pub total: Rupiah,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        let parsed = line_items::parse_items(&order.items);
        let total = order
            .invoice_total
            .unwrap_or_else(|| parsed.line_revenue());
        Self {
            id: order.id,
            customer_name: order.customer_name,
            status: order.status,
            total_items: parsed.total_quantity(),
            total,
            created_at: order.created_at,
        }
    }
}

/// `GET /api/orders` - list recent orders, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let orders = db::orders::list_recent(state.pool(), limit).await?;
    Ok(Json(orders.into_iter().map(OrderSummary::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(items: serde_json::Value, invoice_total: Option<i64>) -> Order {
        Order {
            id: OrderId::new(1),
            customer_name: "Pak Budi".to_owned(),
            status: OrderStatus::Completed,
            items,
            invoice_total: invoice_total.map(Rupiah::new),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_prefers_invoice_total() {
        let summary = OrderSummary::from(order(
            json!([{"productId": 1, "quantity": 2, "price": 6000}]),
            Some(15_000),
        ));
        assert_eq!(summary.total, Rupiah::new(15_000));
        assert_eq!(summary.total_items, 2);
    }

    #[test]
    fn test_summary_falls_back_to_line_items() {
        let summary = OrderSummary::from(order(
            json!([{"productId": 1, "quantity": 3, "price": 6000}]),
            None,
        ));
        assert_eq!(summary.total, Rupiah::new(18_000));
        assert_eq!(summary.total_items, 3);
    }
}
