//! Order database operations.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use tirta_core::{OrderId, Rupiah};

use crate::models::Order;
use crate::reports::DateRange;

use super::RepositoryError;

/// Raw row shape shared by the order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    status: String,
    items: JsonValue,
    invoice_total: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e: String| RepositoryError::DataCorruption(e))?;
        Ok(Self {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            status,
            items: row.items,
            invoice_total: row.invoice_total.map(Rupiah::new),
            created_at: row.created_at,
        })
    }
}

/// Fetch completed orders created within `range` (half-open), oldest first,
/// with their linked invoice total when one was issued.
///
/// This is the `OrderSource` collaborator query used by report aggregation.
///
/// # Errors
///
/// Returns an error if the query fails or a row carries an invalid status.
pub async fn find_completed_in_range(
    pool: &PgPool,
    range: &DateRange,
) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        r"
        SELECT o.id, o.customer_name, o.status, o.items, o.created_at,
               i.total AS invoice_total
        FROM orders o
        LEFT JOIN invoices i ON i.order_id = o.id
        WHERE o.status = 'completed'
          AND o.created_at >= $1
          AND o.created_at < $2
        ORDER BY o.created_at
        ",
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

/// Fetch the most recent orders regardless of status, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row carries an invalid status.
pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        r"
        SELECT o.id, o.customer_name, o.status, o.items, o.created_at,
               i.total AS invoice_total
        FROM orders o
        LEFT JOIN invoices i ON i.order_id = o.id
        ORDER BY o.created_at DESC
        LIMIT $1
        ",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tirta_core::OrderStatus;

    #[test]
    fn test_row_conversion() {
        let row = OrderRow {
            id: 9,
            customer_name: "Ibu Sari".to_owned(),
            status: "completed".to_owned(),
            items: json!([{"productId": 1, "quantity": 2, "price": 6000}]),
            invoice_total: Some(12_000),
            created_at: Utc::now(),
        };
        let order = Order::try_from(row).expect("valid row");
        assert_eq!(order.id, OrderId::new(9));
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.invoice_total, Some(Rupiah::new(12_000)));
    }

    #[test]
    fn test_row_conversion_rejects_unknown_status() {
        let row = OrderRow {
            id: 1,
            customer_name: String::new(),
            status: "finished".to_owned(),
            items: json!([]),
            invoice_total: None,
            created_at: Utc::now(),
        };
        assert!(matches!(
            Order::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
