//! Product domain model.

use serde::{Deserialize, Serialize};

use tirta_core::{ProductCategory, ProductId, Rupiah};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Catalog category.
    pub category: ProductCategory,
    /// Reference unit price in whole rupiah.
    pub price: Rupiah,
}
