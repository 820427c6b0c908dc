//! Product catalog route handlers.
//!
//! Reads are public; writes require the admin claim via
//! [`RequireAdmin`]. Listing query parameters are validated here, at the
//! boundary, before anything reaches the repository.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tangelo_core::ProductId;

use crate::db::{ProductQuery, ProductRepository, SortBy, SortOrder};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::state::AppState;

const INVALID_QUERY: &str = "Invalid query parameters";
const PRODUCT_NOT_FOUND: &str = "Product not found";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Product as serialized on the wire.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub stock_quantity: i32,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            description: p.description,
            stock_quantity: p.stock_quantity,
            category: p.category,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Create request body. Every field is required.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub stock_quantity: i32,
    pub category: String,
}

/// Update request body. Any subset of fields; omitted fields retain
/// their prior value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
}

/// Raw listing query parameters, as received.
///
/// Numeric fields arrive as strings and are validated by
/// [`ListQuery::into_query`]; anything unparseable is a 400, never a
/// pass-through to the database.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Listing response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub products: Vec<ProductResponse>,
}

impl ListQuery {
    /// Validate the raw parameters into a repository query plus the page
    /// number for the response envelope.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `page` or `limit` is not an
    /// integer >= 1, a price bound is not a decimal, or `sortBy`/`order`
    /// names something unrecognized.
    fn into_query(self) -> Result<(ProductQuery, i64)> {
        let page = parse_positive_int(self.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive_int(self.limit.as_deref(), DEFAULT_LIMIT)?;

        let min_price = self.min_price.as_deref().map(parse_price).transpose()?;
        let max_price = self.max_price.as_deref().map(parse_price).transpose()?;

        let sort_by = match self.sort_by.as_deref() {
            Some(s) => s
                .parse::<SortBy>()
                .map_err(|()| AppError::Validation(INVALID_QUERY.to_string()))?,
            None => SortBy::default(),
        };
        let order = match self.order.as_deref() {
            Some(s) => s
                .parse::<SortOrder>()
                .map_err(|()| AppError::Validation(INVALID_QUERY.to_string()))?,
            None => SortOrder::default(),
        };

        let query = ProductQuery {
            search: self.search,
            category: self.category,
            min_price,
            max_price,
            sort_by,
            order,
            limit,
            offset: (page - 1) * limit,
        };

        Ok((query, page))
    }
}

/// Parse an integer parameter that must be >= 1.
fn parse_positive_int(raw: Option<&str>, default: i64) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::Validation(INVALID_QUERY.to_string())),
    }
}

/// Parse a price bound parameter.
fn parse_price(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| AppError::Validation(INVALID_QUERY.to_string()))
}

/// Reject negative prices and stock counts.
fn validate_non_negative(price: Option<Decimal>, stock_quantity: Option<i32>) -> Result<()> {
    if price.is_some_and(|p| p.is_sign_negative()) {
        return Err(AppError::Validation(
            "Product price must be non-negative".to_string(),
        ));
    }
    if stock_quantity.is_some_and(|q| q < 0) {
        return Err(AppError::Validation(
            "Stock quantity must be non-negative".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products` - filtered, sorted, paginated listing.
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let (query, page) = raw.into_query()?;
    let limit = query.limit;

    let (products, total) = ProductRepository::new(state.pool()).list(&query).await?;

    Ok(Json(ListResponse {
        total,
        page,
        total_pages: (total as u64).div_ceil(limit as u64) as i64,
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/products` - create a product. Admin only.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    validate_non_negative(Some(req.price), Some(req.stock_quantity))?;

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: req.name,
            price: req.price,
            description: req.description,
            stock_quantity: req.stock_quantity,
            category: req.category,
        })
        .await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// `GET /api/products/{id}` - fetch one product.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

    Ok(Json(product.into()))
}

/// `PUT /api/products/{id}` - partial update. Admin only.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    validate_non_negative(req.price, req.stock_quantity)?;

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            &ProductChanges {
                name: req.name,
                price: req.price,
                description: req.description,
                stock_quantity: req.stock_quantity,
                category: req.category,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

    Ok(Json(product.into()))
}

/// `DELETE /api/products/{id}` - delete a product. Admin only.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()));
    }

    tracing::info!(product_id = id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}
