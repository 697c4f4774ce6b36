//! Trait abstractions for dependency injection and testability.
//!
//! The engine's external collaborators — the relational store, the
//! payment gateway proxy, the SMS gateway, the identity provider, and
//! the clock — are all reached through these traits, enabling unit
//! testing without network connections or a live database.

pub mod identity;
pub mod payment;
pub mod sms;
pub mod store;
pub mod time;

// Re-export all traits for crate-internal use.
// The public API surface is controlled by lib.rs re-exports.
pub use identity::IdentityProvider;
pub use payment::{
    CardInfo, CustomerInfo, GatewayError, PaymentData, PaymentGateway, PaymentLink,
    PaymentRequest, PaymentResult, ProductLine,
};
pub use sms::{SmsGateway, SmsKind};
pub use store::{DepositTransition, MarketStore, StoreError};
pub use time::TimeProvider;

// Re-export default implementations
pub use time::SystemTimeProvider;
