pub mod harness;

pub use harness::{card, client_ctx, failure_callback, success_callback, MarketHarness};
