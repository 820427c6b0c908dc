//! Rate limiting middleware using governor and `tower_governor`.
//!
//! One global limiter caps every client at roughly 100 requests per
//! 15-minute window, keyed by client IP. Exceeding the cap yields an
//! immediate 429; nothing queues.

use std::sync::Arc;

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Rate limiter layer type for Axum.
///
/// Uses `SmartIpKeyExtractor` to get the real client IP from common proxy
/// headers, falling back to the peer address.
pub type RateLimiterLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the global rate limiter: ~100 requests per 15 minutes per IP.
///
/// Configuration: 1 request every 9 seconds (replenish), burst of 100,
/// so a quiet client can spend its whole window at once but sustained
/// traffic levels out at the cap.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid
/// positive integers (`per_second(9)` and `burst_size(100)`), which are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn global_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(9) // Replenish 1 token every 9 seconds (~100 / 15 min)
        .burst_size(100)
        .finish()
        .expect("rate limiter config with per_second(9) and burst_size(100) is valid");
    GovernorLayer::new(Arc::new(config))
}
