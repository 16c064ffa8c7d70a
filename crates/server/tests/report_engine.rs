//! End-to-end report engine tests against an in-memory order source.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use tirta_core::{OrderId, OrderStatus, ProductCategory, ProductId, Rupiah};
use tirta_server::models::{Order, Product};
use tirta_server::reports::{
    self, DateRange, OrderSource, ProductCatalog, ReportParams, ReportType,
};

/// Fixed in-memory order store standing in for Postgres.
struct FixedSource {
    orders: Vec<Order>,
}

impl OrderSource for FixedSource {
    async fn completed_in_range(
        &self,
        range: &DateRange,
    ) -> Result<Vec<Order>, tirta_server::db::RepositoryError> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.status.is_completed() && range.contains(o.created_at))
            .cloned()
            .collect())
    }
}

fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid timestamp")
}

fn catalog() -> ProductCatalog {
    ProductCatalog::new(vec![
        Product {
            id: ProductId::new(1),
            name: "Refill Gallon 19L".to_owned(),
            category: ProductCategory::Gallon,
            price: Rupiah::new(6000),
        },
        Product {
            id: ProductId::new(2),
            name: "Bottle 600ml (24x)".to_owned(),
            category: ProductCategory::Bottle,
            price: Rupiah::new(38_000),
        },
    ])
}

fn order(
    id: i64,
    status: OrderStatus,
    items: serde_json::Value,
    invoice_total: Option<i64>,
    created_at: DateTime<Utc>,
) -> Order {
    Order {
        id: OrderId::new(id),
        customer_name: format!("Customer {id}"),
        status,
        items,
        invoice_total: invoice_total.map(Rupiah::new),
        created_at,
    }
}

#[tokio::test]
async fn daily_report_buckets_and_sums() {
    // Two completed orders on Jan 8 and Jan 10; Jan 9 is empty. An
    // in-delivery order on Jan 9 must not count.
    let source = FixedSource {
        orders: vec![
            order(
                1,
                OrderStatus::Completed,
                json!([{"productId": 1, "quantity": 2, "price": 6000}]),
                Some(15_000),
                ts(2025, 1, 8, 9),
            ),
            order(
                2,
                OrderStatus::InDelivery,
                json!([{"productId": 1, "quantity": 5, "price": 6000}]),
                None,
                ts(2025, 1, 9, 10),
            ),
            order(
                3,
                OrderStatus::Completed,
                json!([
                    {"productId": 1, "quantity": 1, "price": 6000},
                    {"productId": 2, "quantity": 1, "price": 16000}
                ]),
                Some(22_000),
                ts(2025, 1, 10, 8),
            ),
        ],
    };

    let params = ReportParams::normalized(ReportType::Daily, Some(3), None);
    let payload = reports::build_report(&source, &catalog(), &params, ts(2025, 1, 10, 12))
        .await
        .expect("report builds");

    assert_eq!(payload.report_type, ReportType::Daily);
    assert_eq!(payload.period, "Last 3 daily");

    // Chronological order, oldest first.
    let labels: Vec<&str> = payload.reports.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["08 Jan 2025", "09 Jan 2025", "10 Jan 2025"]);

    let revenues: Vec<i64> = payload
        .reports
        .iter()
        .map(|r| r.total_revenue.as_i64())
        .collect();
    assert_eq!(revenues, vec![15_000, 0, 22_000]);

    assert_eq!(payload.summary.total_revenue, Rupiah::new(37_000));
    assert_eq!(payload.summary.total_orders, 2);
    assert_eq!(payload.summary.total_items, 4);
    // 37_000 / 2, whole rupiah.
    assert_eq!(payload.summary.average_order_value, Rupiah::new(18_500));
}

#[tokio::test]
async fn invoice_total_takes_precedence_over_line_items() {
    // Line items sum to 12_000 but the invoice says 10_000 (manual discount).
    let source = FixedSource {
        orders: vec![order(
            1,
            OrderStatus::Completed,
            json!([{"productId": 1, "quantity": 2, "price": 6000}]),
            Some(10_000),
            ts(2025, 3, 5, 9),
        )],
    };

    let params = ReportParams::normalized(ReportType::Daily, Some(1), None);
    let payload = reports::build_report(&source, &catalog(), &params, ts(2025, 3, 5, 18))
        .await
        .expect("report builds");

    assert_eq!(payload.summary.total_revenue, Rupiah::new(10_000));
    // The product ranking stays line-item derived.
    assert_eq!(payload.product_sales.len(), 1);
    assert_eq!(payload.product_sales[0].revenue, Rupiah::new(12_000));
    assert_eq!(payload.product_sales[0].quantity, 2);
}

#[tokio::test]
async fn missing_invoice_falls_back_to_line_items() {
    let source = FixedSource {
        orders: vec![order(
            1,
            OrderStatus::Completed,
            json!([{"productId": 2, "quantity": 3, "price": 16000}]),
            None,
            ts(2025, 3, 5, 9),
        )],
    };

    let params = ReportParams::normalized(ReportType::Daily, Some(1), None);
    let payload = reports::build_report(&source, &catalog(), &params, ts(2025, 3, 5, 18))
        .await
        .expect("report builds");

    assert_eq!(payload.summary.total_revenue, Rupiah::new(48_000));
}

#[tokio::test]
async fn empty_window_yields_zeroed_payload() {
    let source = FixedSource { orders: vec![] };

    let params = ReportParams::normalized(ReportType::Weekly, None, None);
    let payload = reports::build_report(&source, &catalog(), &params, ts(2025, 6, 1, 12))
        .await
        .expect("report builds");

    assert_eq!(payload.reports.len(), 4);
    assert!(payload.reports.iter().all(|r| {
        r.total_revenue == Rupiah::ZERO && r.total_items == 0 && r.total_orders == 0
    }));
    assert_eq!(payload.summary.total_revenue, Rupiah::ZERO);
    assert_eq!(payload.summary.average_order_value, Rupiah::ZERO);
    assert!(payload.product_sales.is_empty());
}

#[tokio::test]
async fn repeated_runs_are_identical_except_timestamp() {
    let source = FixedSource {
        orders: vec![order(
            1,
            OrderStatus::Completed,
            json!([{"productId": 1, "quantity": 4, "price": 6000}]),
            Some(24_000),
            ts(2025, 2, 14, 10),
        )],
    };

    let params = ReportParams::normalized(ReportType::Monthly, Some(2), None);
    let reference = ts(2025, 2, 20, 9);

    let first = reports::build_report(&source, &catalog(), &params, reference)
        .await
        .expect("report builds");
    let mut second = reports::build_report(&source, &catalog(), &params, reference)
        .await
        .expect("report builds");

    second.metadata.generated_at = first.metadata.generated_at;
    assert_eq!(first, second);
}

#[tokio::test]
async fn pdf_renders_from_engine_output() {
    let source = FixedSource {
        orders: vec![order(
            1,
            OrderStatus::Completed,
            json!([{"productId": 1, "quantity": 2, "price": 6000}]),
            Some(12_000),
            ts(2025, 1, 10, 8),
        )],
    };

    let params = ReportParams::normalized(ReportType::Daily, None, None);
    let payload = reports::build_report(&source, &catalog(), &params, ts(2025, 1, 10, 12))
        .await
        .expect("report builds");

    let bytes = reports::pdf::render(&payload, "Tirta Depot").expect("renders");
    assert!(bytes.starts_with(b"%PDF"));
}
