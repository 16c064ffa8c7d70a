//! Tolerant line-item parsing.
//!
//! An order's `items` payload is loosely typed: normally a JSON array of
//! `{productId, quantity, price}` objects, but legacy rows store a JSON
//! *string* embedding that array, and individual entries may be missing
//! fields or carry numbers as strings. This module decodes that ambiguous
//! shape once, at the ingestion boundary, into strict [`LineItem`] records;
//! nothing downstream ever sees the raw representation.
//!
//! Parsing never fails. Undecodable payloads yield an empty list, invalid
//! entries are counted in [`ParsedItems::skipped`] and dropped, and every
//! anomaly is at most a logged warning.

use serde_json::Value as JsonValue;

use tirta_core::{ProductId, Rupiah};

/// A validated line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Referenced product, when the entry carried a usable ID.
    ///
    /// `None` still contributes to period item/revenue totals; it is only
    /// excluded from the product-sales ranking.
    pub product_id: Option<ProductId>,
    /// Units ordered. Always positive; non-positive entries are skipped.
    pub quantity: i64,
    /// Unit price in whole rupiah, defaulted to zero when unparseable.
    pub price: Rupiah,
}

impl LineItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub const fn line_total(&self) -> Rupiah {
        self.price.times(self.quantity)
    }
}

/// Result of parsing one order's raw items payload.
#[derive(Debug, Clone, Default)]
pub struct ParsedItems {
    /// Entries that passed validation.
    pub items: Vec<LineItem>,
    /// Entries dropped for being malformed or having no positive quantity.
    pub skipped: usize,
}

impl ParsedItems {
    /// Total units across all valid entries.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of `price * quantity` across all valid entries.
    #[must_use]
    pub fn line_revenue(&self) -> Rupiah {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

/// Parse a raw items payload. Never fails.
///
/// Accepts either a JSON array or a JSON string embedding one; anything else
/// (including undecodable strings) yields an empty result with a warning.
#[must_use]
pub fn parse_items(raw: &JsonValue) -> ParsedItems {
    match raw {
        JsonValue::Array(entries) => parse_entries(entries),
        JsonValue::String(encoded) => match serde_json::from_str::<JsonValue>(encoded) {
            Ok(JsonValue::Array(entries)) => parse_entries(&entries),
            Ok(other) => {
                tracing::warn!(
                    kind = json_kind(&other),
                    "string-encoded items payload is not an array; treating as empty"
                );
                ParsedItems::default()
            }
            Err(error) => {
                tracing::warn!(%error, "undecodable items payload; treating as empty");
                ParsedItems::default()
            }
        },
        JsonValue::Null => ParsedItems::default(),
        other => {
            tracing::warn!(
                kind = json_kind(other),
                "items payload is neither array nor string; treating as empty"
            );
            ParsedItems::default()
        }
    }
}

fn parse_entries(entries: &[JsonValue]) -> ParsedItems {
    let mut parsed = ParsedItems {
        items: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for entry in entries {
        let JsonValue::Object(fields) = entry else {
            parsed.skipped += 1;
            continue;
        };

        // Legacy rows use `id` where newer ones use `productId`.
        let product_id = coerce_int(fields.get("productId").or_else(|| fields.get("id")));
        let quantity = coerce_int(fields.get("quantity"));
        let price = Rupiah::new(coerce_int(fields.get("price")));

        if quantity <= 0 {
            parsed.skipped += 1;
            continue;
        }

        parsed.items.push(LineItem {
            product_id: (product_id > 0).then(|| ProductId::new(product_id)),
            quantity,
            price,
        });
    }

    parsed
}

/// Best-effort integer coercion: accepts integers, floats (truncated), and
/// numeric strings. Everything else becomes 0.
fn coerce_int(value: Option<&JsonValue>) -> i64 {
    match value {
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(JsonValue::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
