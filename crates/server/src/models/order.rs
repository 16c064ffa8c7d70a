//! Order domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use tirta_core::{OrderId, OrderStatus, Rupiah};

/// A customer order as read from the store.
///
/// The `items` field is deliberately kept as raw JSON: depending on the row's
/// provenance it is either an array of line-item objects or a JSON string
/// embedding one (legacy imports). The report engine's line-item parser is
/// the only place allowed to interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer display name.
    pub customer_name: String,
    /// Lifecycle status; only completed orders count toward reports.
    pub status: OrderStatus,
    /// Raw line-item payload (array of objects, or a JSON-encoded string).
    pub items: JsonValue,
    /// Authoritative total from the linked invoice, when one was issued.
    ///
    /// May include manual adjustments not reflected in the raw line items,
    /// which is why it takes precedence for period revenue.
    pub invoice_total: Option<Rupiah>,
    /// When the order was placed. Immutable once set.
    pub created_at: DateTime<Utc>,
}
