//! Product repository for database operations.
//!
//! Listing combines an optional-filter conjunction with a validated sort
//! key. Filters bind as nullable parameters (`$n IS NULL OR col ...`);
//! the sort column and direction come from closed enums, so the only
//! interpolated SQL fragments are known static strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use tangelo_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductChanges};

/// Columns selected for every product row.
const PRODUCT_COLUMNS: &str = "id, name, price, description, stock_quantity, category, \
     created_at, updated_at";

/// Conjunction of the optional listing filters.
///
/// Binds: $1 search, $2 category, $3 min price, $4 max price.
const LIST_FILTER: &str = "($1::text IS NULL OR name ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR category = $2)
          AND ($3::numeric IS NULL OR price >= $3)
          AND ($4::numeric IS NULL OR price <= $4)";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Decimal,
    description: String,
    stock_quantity: i32,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            stock_quantity: row.stock_quantity,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Recognized sort columns for product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Id,
    #[default]
    Name,
    Price,
    StockQuantity,
    Category,
    CreatedAt,
}

impl SortBy {
    /// The column name this sort key maps to.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::StockQuantity => "stock_quantity",
            Self::Category => "category",
            Self::CreatedAt => "created_at",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = ();

    /// Accepts exactly the column names exposed on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "stock_quantity" => Ok(Self::StockQuantity),
            "category" => Ok(Self::Category),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(()),
        }
    }
}

/// Sort direction. `ASC`/`DESC`, case-insensitive on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(())
        }
    }
}

/// A validated listing query: filters, sort, and page window.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Case-insensitive substring match on `name`.
    pub search: Option<String>,
    /// Exact match on `category`.
    pub category: Option<String>,
    /// Inclusive lower bound on `price`.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on `price`.
    pub max_price: Option<Decimal>,
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (name, price, description, stock_quantity, category)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&new.name)
            .bind(new.price)
            .bind(&new.description)
            .bind(new.stock_quantity)
            .bind(&new.category)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Apply a partial update. `None` fields retain their prior value.
    ///
    /// Returns `None` if no product has that ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "UPDATE products
             SET name = COALESCE($2, name),
                 price = COALESCE($3, price),
                 description = COALESCE($4, description),
                 stock_quantity = COALESCE($5, stock_quantity),
                 category = COALESCE($6, category),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.price)
            .bind(changes.description.as_deref())
            .bind(changes.stock_quantity)
            .bind(changes.category.as_deref())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a product by ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List products matching a query, with the total count of the full
    /// filtered set (independent of the page window).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, i64), RepositoryError> {
        let count_sql = format!("SELECT COUNT(*) FROM products WHERE {LIST_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(query.search.as_deref())
            .bind(query.category.as_deref())
            .bind(query.min_price)
            .bind(query.max_price)
            .fetch_one(self.pool)
            .await?;

        let rows_sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE {LIST_FILTER}
             ORDER BY {} {}
             LIMIT $5 OFFSET $6",
            query.sort_by.column(),
            query.order.as_sql(),
        );
        let rows = sqlx::query_as::<_, ProductRow>(&rows_sql)
            .bind(query.search.as_deref())
            .bind(query.category.as_deref())
            .bind(query.min_price)
            .bind(query.max_price)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_sort_by_accepts_known_columns() {
        assert_eq!(SortBy::from_str("name"), Ok(SortBy::Name));
        assert_eq!(SortBy::from_str("price"), Ok(SortBy::Price));
        assert_eq!(SortBy::from_str("stock_quantity"), Ok(SortBy::StockQuantity));
        assert_eq!(SortBy::from_str("category"), Ok(SortBy::Category));
        assert_eq!(SortBy::from_str("id"), Ok(SortBy::Id));
        assert_eq!(SortBy::from_str("created_at"), Ok(SortBy::CreatedAt));
    }

    #[test]
    fn test_sort_by_rejects_unknown_columns() {
        assert!(SortBy::from_str("password").is_err());
        assert!(SortBy::from_str("name; DROP TABLE products").is_err());
        assert!(SortBy::from_str("").is_err());
        // Exact names only, no case folding
        assert!(SortBy::from_str("Name").is_err());
    }

    #[test]
    fn test_sort_order_case_insensitive() {
        assert_eq!(SortOrder::from_str("ASC"), Ok(SortOrder::Asc));
        assert_eq!(SortOrder::from_str("asc"), Ok(SortOrder::Asc));
        assert_eq!(SortOrder::from_str("Desc"), Ok(SortOrder::Desc));
        assert!(SortOrder::from_str("sideways").is_err());
    }

    #[test]
    fn test_sort_defaults() {
        assert_eq!(SortBy::default(), SortBy::Name);
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn test_sort_sql_fragments() {
        assert_eq!(SortBy::StockQuantity.column(), "stock_quantity");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }
}
