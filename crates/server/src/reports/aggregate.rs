//! Per-period aggregation and final report assembly.
//!
//! # Revenue sources
//!
//! Period revenue prefers the linked invoice total when one exists, because
//! invoices may carry manual adjustments the raw line items do not. The
//! product-sales ranking has no per-product authoritative source and is
//! always derived from parsed line items. When an invoice total and its line
//! items diverge, the two report sections diverge with it; this is inherited
//! behavior, kept deliberately.

use std::collections::HashMap;

use chrono::Utc;
use tirta_core::{ProductCategory, Rupiah};

use crate::models::Order;

use super::line_items::parse_items;
use super::periods::PeriodBucket;
use super::{
    ProductCatalog, ProductSales, ReportMetadata, ReportParams, ReportPayload, ReportPeriod,
    ReportSummary,
};

/// Insertion-ordered per-product-name accumulator.
///
/// Keeping entries in first-seen order makes the final stable sort break
/// revenue ties by insertion order, so repeated runs over the same snapshot
/// rank identically.
#[derive(Debug, Default)]
pub struct ProductAccumulator {
    entries: Vec<ProductSales>,
    index: HashMap<String, usize>,
}

impl ProductAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sale to the product named `name`.
    pub fn record(&mut self, name: &str, category: ProductCategory, quantity: i64, revenue: Rupiah) {
        if let Some(&slot) = self.index.get(name) {
            if let Some(entry) = self.entries.get_mut(slot) {
                entry.quantity += quantity;
                entry.revenue = entry.revenue.saturating_add(revenue);
            }
        } else {
            self.index.insert(name.to_owned(), self.entries.len());
            self.entries.push(ProductSales {
                name: name.to_owned(),
                quantity,
                revenue,
                category,
            });
        }
    }

    /// Consume the accumulator, producing entries ranked by revenue
    /// descending. The sort is stable, so ties keep first-seen order.
    #[must_use]
    pub fn into_ranked(self) -> Vec<ProductSales> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        entries
    }
}

/// Fold one bucket's completed orders into a report row, also feeding the
/// window-wide `product_acc`.
///
/// Per order: revenue prefers the invoice total over summed line totals;
/// item counts always come from parsed line items; line items that resolve
/// against the catalog are accumulated into both the period breakdown and
/// the window-wide product map. A malformed items payload degrades to zero
/// item contribution for that order and never aborts the fold.
pub fn aggregate_period(
    bucket: &PeriodBucket,
    orders: &[Order],
    catalog: &ProductCatalog,
    product_acc: &mut ProductAccumulator,
) -> ReportPeriod {
    let mut total_revenue = Rupiah::ZERO;
    let mut total_items = 0_i64;
    let mut period_acc = ProductAccumulator::new();

    for order in orders {
        let parsed = parse_items(&order.items);
        if parsed.skipped > 0 {
            tracing::warn!(
                order_id = %order.id,
                skipped = parsed.skipped,
                "order items contained invalid entries"
            );
        }

        let order_revenue = order
            .invoice_total
            .unwrap_or_else(|| parsed.line_revenue());
        total_revenue = total_revenue.saturating_add(order_revenue);
        total_items += parsed.total_quantity();

        for item in &parsed.items {
            let Some(product) = item.product_id.and_then(|id| catalog.get(id)) else {
                // Unresolvable reference: excluded from the ranking only.
                continue;
            };
            let line_revenue = item.line_total();
            period_acc.record(&product.name, product.category, item.quantity, line_revenue);
            product_acc.record(&product.name, product.category, item.quantity, line_revenue);
        }
    }

    ReportPeriod {
        label: bucket.label.clone(),
        date_range: bucket.range,
        total_revenue,
        total_items,
        total_orders: orders.len() as i64,
        item_breakdown: period_acc.into_ranked(),
    }
}

/// Combine per-period rows and the window-wide product map into the final
/// payload.
///
/// `rows` arrive newest-first from the bucketer and are reversed here so the
/// payload lists periods chronologically, oldest first. The summary is an
/// exact sum over the rows; the average order value is whole-rupiah integer
/// division, defined as zero when there are no orders.
#[must_use]
pub fn assemble(
    params: &ReportParams,
    mut rows: Vec<ReportPeriod>,
    product_acc: ProductAccumulator,
) -> ReportPayload {
    rows.reverse();

    let total_revenue: Rupiah = rows.iter().map(|r| r.total_revenue).sum();
    let total_items: i64 = rows.iter().map(|r| r.total_items).sum();
    let total_orders: i64 = rows.iter().map(|r| r.total_orders).sum();
    let average_order_value = if total_orders > 0 {
        Rupiah::new(total_revenue.as_i64() / total_orders)
    } else {
        Rupiah::ZERO
    };

    ReportPayload {
        report_type: params.report_type,
        period: params.period_label(),
        reports: rows,
        summary: ReportSummary {
            total_revenue,
            total_items,
            total_orders,
            average_order_value,
        },
        product_sales: product_acc.into_ranked(),
        metadata: ReportMetadata {
            generated_at: Utc::now(),
        },
    }
}
