//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use tangelo_core::ProductId;

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price. Non-negative.
    pub price: Decimal,
    /// Free-form description.
    pub description: String,
    /// Units in stock. Non-negative.
    pub stock_quantity: i32,
    /// Category name, matched exactly when filtering.
    pub category: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub stock_quantity: i32,
    pub category: String,
}

/// Partial update of a product. `None` fields retain their prior value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
}
