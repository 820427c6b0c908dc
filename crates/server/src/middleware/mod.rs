//! HTTP middleware for the API server.
//!
//! - [`auth`] - `RequireAuth` / `RequireAdmin` extractors for token-gated
//!   routes
//! - [`rate_limit`] - global request-rate cap (governor)

pub mod auth;
pub mod rate_limit;

pub use auth::{CurrentUser, RequireAdmin, RequireAuth};
pub use rate_limit::global_rate_limiter;
