//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Users
//! POST /users/signup           - Register (400 on duplicate email)
//! POST /users/login            - Authenticate, returns a session token
//!
//! # Products
//! GET    /api/products         - Filtered/sorted/paginated listing
//! POST   /api/products         - Create (admin)
//! GET    /api/products/{id}    - Fetch one
//! PUT    /api/products/{id}    - Partial update (admin)
//! DELETE /api/products/{id}    - Delete (admin)
//! ```
//!
//! Admin gating happens in the handlers via the `RequireAdmin`
//! extractor; health endpoints live in `main.rs`.

pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create all routes for the API server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/api/products", product_routes())
}
