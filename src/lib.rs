//! Admission-gated bidding and offer engine for time-boxed property
//! listings.
//!
//! Participation is gated by a refundable deposit paid through an
//! external card-payment gateway; concurrent bids are totally ordered
//! and strictly increasing; offers are unique per (listing, user);
//! gateway callbacks settle deposits idempotently; outbid notifications
//! derive from the ledger, never from client state.

pub mod admission;
pub mod config;
pub mod error;
pub mod feed;
pub mod identity;
pub mod ledger;
pub mod marketplace;
pub mod notify;
pub mod payment;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use admission::{Admission, AdmissionControl};
pub use error::{MarketError, MarketResult};
pub use feed::{ListingEvent, ListingFeed};
pub use identity::{Contact, PhoneNumber};
pub use ledger::{BidLedger, OfferLedger};
pub use marketplace::{
    Bid, BidId, Deposit, DepositId, DepositStatus, LifecycleStatus, Listing, ListingId,
    ListingKind, Offer, OfferId, OfferStatus, OrderId, UserId,
};
pub use notify::NotificationDispatcher;
pub use payment::{ClientContext, PaymentOrchestrator};
pub use traits::{
    IdentityProvider, MarketStore, PaymentGateway, SmsGateway, SystemTimeProvider, TimeProvider,
};
