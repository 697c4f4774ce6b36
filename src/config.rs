//! Configuration constants for the bidding engine.
//!
//! This module centralizes magic numbers and configuration values
//! to improve maintainability and enable easier tuning.

/// Maximum attempts for a bid insert under optimistic concurrency.
/// The first attempt plus one recompute-and-retry after a conflict.
pub const BID_PLACE_MAX_ATTEMPTS: u32 = 2;

/// Maximum attempts for creating a pending deposit when two tabs race
/// `begin_admission` for the same (listing, user).
pub const ADMISSION_INSERT_MAX_ATTEMPTS: u32 = 2;

/// Timeout in seconds for a single payment-gateway request.
pub const GATEWAY_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum concurrent in-flight SMS deliveries during notification fan-out.
pub const NOTIFY_MAX_CONCURRENT: usize = 8;

/// Timeout in seconds for a single SMS delivery attempt.
pub const NOTIFY_SEND_TIMEOUT_SECS: u64 = 10;

/// Buffer size for per-listing event feed channels. Slow subscribers
/// observe a lag and re-fetch; the feed is never the source of truth.
pub const LISTING_FEED_BUFFER: usize = 64;

/// Default base URL the gateway redirects back to after payment.
/// The payment order id is appended as a query parameter.
pub const DEFAULT_PAYMENT_RETURN_URL: &str = "https://localhost/payments/return";

/// Environment variable overriding the payment return URL base.
pub const PAYMENT_RETURN_URL_ENV: &str = "MARKET_PAYMENT_RETURN_URL";

/// Resolve the payment return URL base from the environment, falling
/// back to the compiled-in default.
pub fn payment_return_url() -> String {
    std::env::var(PAYMENT_RETURN_URL_ENV)
        .unwrap_or_else(|_| DEFAULT_PAYMENT_RETURN_URL.to_string())
}
