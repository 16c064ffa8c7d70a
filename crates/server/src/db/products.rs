//! Product catalog database operations.

use sqlx::PgPool;

use tirta_core::{ProductId, Rupiah};

use crate::models::Product;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: String,
    price: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e: String| RepositoryError::DataCorruption(e))?;
        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            category,
            price: Rupiah::new(row.price),
        })
    }
}

/// Fetch the full product catalog, ordered by name.
///
/// This is the `ProductLookup.findAll()` collaborator used to resolve
/// line-item product references during report aggregation.
///
/// # Errors
///
/// Returns an error if the query fails or a row carries an invalid category.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Product>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r"
        SELECT id, name, category, price
        FROM products
        ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Product::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirta_core::ProductCategory;

    #[test]
    fn test_row_conversion() {
        let row = ProductRow {
            id: 3,
            name: "Refill Gallon 19L".to_owned(),
            category: "gallon".to_owned(),
            price: 6000,
        };
        let product = Product::try_from(row).expect("valid row");
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.category, ProductCategory::Gallon);
        assert_eq!(product.price, Rupiah::new(6000));
    }

    #[test]
    fn test_row_conversion_rejects_unknown_category() {
        let row = ProductRow {
            id: 1,
            name: "Mystery".to_owned(),
            category: "jerrycan".to_owned(),
            price: 0,
        };
        assert!(matches!(
            Product::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
