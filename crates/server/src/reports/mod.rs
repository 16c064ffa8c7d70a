//! Sales-report aggregation engine.
//!
//! Scans historical completed orders, buckets them into time periods, and
//! produces a [`ReportPayload`]: per-period revenue/item/order totals, grand
//! totals, and a product-sales ranking over the whole window. The payload can
//! be serialized as JSON or handed to [`pdf::render`] for a downloadable
//! document.
//!
//! # Pipeline
//!
//! 1. [`periods::bucketize`] turns request parameters into an ordered list of
//!    date ranges (newest first).
//! 2. For each range, the [`OrderSource`] supplies completed orders and
//!    [`aggregate::aggregate_period`] folds them into a period row plus a
//!    window-wide product accumulator.
//! 3. [`aggregate::assemble`] reverses the rows into chronological order,
//!    computes the summary, and ranks products by revenue.
//!
//! Payloads are computed fresh on every request; nothing here is cached.

pub mod aggregate;
pub mod line_items;
pub mod pdf;
pub mod periods;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tirta_core::{ProductCategory, ProductId, Rupiah};

use crate::db::RepositoryError;
use crate::models::{Order, Product};

pub use periods::{DateRange, PeriodBucket};

/// Hard upper bound on the number of buckets in one report.
pub const MAX_PERIODS: u32 = 366;

/// Which calendar unit a report is bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl ReportType {
    /// Default bucket count when the caller does not supply one.
    ///
    /// This mapping is a UI convenience carried over from the original
    /// application, not an engine constraint.
    #[must_use]
    pub const fn default_periods(self) -> u32 {
        match self {
            Self::Daily => 7,
            Self::Weekly => 4,
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::Yearly => 5,
        }
    }

    /// Lowercase wire name, also used in download filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Capitalized label for document headers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized report request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportParams {
    /// Bucketing unit.
    pub report_type: ReportType,
    /// Number of buckets, already defaulted and clamped.
    pub periods: u32,
    /// Anchor year, relevant only for yearly reports.
    pub year: Option<i32>,
}

impl ReportParams {
    /// Build params from raw request values, applying the per-type default
    /// period count and clamping to [`MAX_PERIODS`].
    #[must_use]
    pub fn normalized(report_type: ReportType, periods: Option<u32>, year: Option<i32>) -> Self {
        let periods = periods
            .unwrap_or_else(|| report_type.default_periods())
            .min(MAX_PERIODS);
        Self {
            report_type,
            periods,
            year,
        }
    }

    /// Human period label, e.g. `"Last 7 daily"`.
    #[must_use]
    pub fn period_label(&self) -> String {
        format!("Last {} {}", self.periods, self.report_type)
    }
}

/// Errors from report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Querying the order store failed. Fatal to the current request; no
    /// partial payload is returned.
    #[error("report data source error: {0}")]
    Source(#[from] RepositoryError),

    /// Serializing the laid-out document failed.
    #[error("document rendering failed: {0}")]
    Render(String),
}

// =============================================================================
// Collaborator interfaces
// =============================================================================

/// Read-only source of completed orders for report aggregation.
///
/// The Postgres-backed implementation lives on [`sqlx::PgPool`]; tests use
/// in-memory fakes.
pub trait OrderSource {
    /// Fetch completed orders whose `created_at` falls within `range`
    /// (half-open, `start <= created_at < end`).
    fn completed_in_range(
        &self,
        range: &DateRange,
    ) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send;
}

impl OrderSource for sqlx::PgPool {
    async fn completed_in_range(&self, range: &DateRange) -> Result<Vec<Order>, RepositoryError> {
        crate::db::orders::find_completed_in_range(self, range).await
    }
}

/// In-memory product lookup built once per request from the catalog table.
///
/// Resolves line-item product IDs to names and categories for the
/// product-sales ranking. Line items whose ID does not resolve are excluded
/// from the ranking only; they still count toward period totals.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    by_id: HashMap<ProductId, Product>,
}

impl ProductCatalog {
    /// Build a catalog from a product listing.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let by_id = products.into_iter().map(|p| (p.id, p)).collect();
        Self { by_id }
    }

    /// Resolve a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// =============================================================================
// Payload types
// =============================================================================

/// One report row: totals for a single time period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// Display label, e.g. `"10 Jan 2025"` or `"Q1 2025"`.
    pub label: String,
    /// The period's date range (half-open).
    pub date_range: DateRange,
    /// Revenue attributed to this period, preferring invoice totals.
    pub total_revenue: Rupiah,
    /// Units sold across all parseable line items.
    pub total_items: i64,
    /// Completed orders in the period.
    pub total_orders: i64,
    /// Per-product totals scoped to this period.
    pub item_breakdown: Vec<ProductSales>,
}

/// Grand totals across the whole report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Sum of all period revenues.
    pub total_revenue: Rupiah,
    /// Sum of all period item counts.
    pub total_items: i64,
    /// Sum of all period order counts.
    pub total_orders: i64,
    /// `total_revenue / total_orders` (whole rupiah), 0 when there are no
    /// orders.
    pub average_order_value: Rupiah,
}

/// Per-product accumulated sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    /// Product display name (unique within one payload).
    pub name: String,
    /// Units sold.
    pub quantity: i64,
    /// Revenue derived from parsed line items.
    pub revenue: Rupiah,
    /// Catalog category.
    pub category: ProductCategory,
}

/// Report generation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// When the payload was assembled.
    pub generated_at: DateTime<Utc>,
}

/// The engine's primary output. Immutable once produced, computed fresh on
/// every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    /// Bucketing unit this report was built with.
    pub report_type: ReportType,
    /// Human window label, e.g. `"Last 7 daily"`.
    pub period: String,
    /// Period rows in chronological order, oldest first.
    pub reports: Vec<ReportPeriod>,
    /// Grand totals.
    pub summary: ReportSummary,
    /// Products ranked by revenue, descending; ties keep first-seen order.
    pub product_sales: Vec<ProductSales>,
    /// Generation metadata.
    pub metadata: ReportMetadata,
}

// =============================================================================
// Orchestration
// =============================================================================

/// Build a report for `params`, anchored at `reference`.
///
/// Periods are fetched and folded sequentially; the product accumulator is
/// threaded through every bucket so the ranking covers the entire window.
///
/// # Errors
///
/// Returns [`ReportError::Source`] if any order query fails. Parsing
/// anomalies inside individual orders never fail the report; they degrade
/// data completeness with a logged warning.
pub async fn build_report<S: OrderSource + Sync>(
    source: &S,
    catalog: &ProductCatalog,
    params: &ReportParams,
    reference: DateTime<Utc>,
) -> Result<ReportPayload, ReportError> {
    let buckets = periods::bucketize(params.report_type, params.periods, reference, params.year);

    let mut product_acc = aggregate::ProductAccumulator::new();
    let mut rows = Vec::with_capacity(buckets.len());
    for bucket in &buckets {
        let orders = source.completed_in_range(&bucket.range).await?;
        rows.push(aggregate::aggregate_period(
            bucket,
            &orders,
            catalog,
            &mut product_acc,
        ));
    }

    Ok(aggregate::assemble(params, rows, product_acc))
}
