//! Relational store abstraction.
//!
//! The service is stateless and horizontally scaled, so every
//! correctness guarantee lives in the store: each method models one
//! transaction, and uniqueness constraints (not application locks) are
//! the real guard against races. Mock and production backends alike
//! must honor the atomicity documented per method.

use async_trait::async_trait;

use crate::marketplace::{
    Bid, Deposit, DepositId, DepositStatus, Listing, ListingId, Offer, OrderId, UserId,
};

/// Errors surfaced by a store backend.
///
/// `UniqueViolation` is part of the contract, not an anomaly: callers
/// translate it to the specific domain error for the constraint that
/// fired. Raw store errors never reach clients.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. The message names
    /// the constraint for logging, never for client display.
    #[error("uniqueness constraint violated: {0}")]
    UniqueViolation(&'static str),

    /// The referenced record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Backend or transaction failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Outcome of a compare-and-set deposit transition.
#[derive(Debug, Clone)]
pub enum DepositTransition {
    /// The deposit was in the expected status and is now transitioned.
    Applied(Deposit),
    /// The deposit was not in the expected status; carries the current
    /// record so the caller can decide whether the race was benign.
    Stale(Deposit),
}

/// Abstraction over the durable relational store.
///
/// Each method runs in its own transaction scoped to the call.
#[async_trait]
pub trait MarketStore: Send + Sync + Clone + 'static {
    /// Fetch a listing from the read-only catalog tables.
    async fn get_listing(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// The live (pending or completed) deposit for (listing, user), if any.
    /// The live-class uniqueness constraint guarantees at most one exists.
    async fn live_deposit(
        &self,
        listing: ListingId,
        user: UserId,
    ) -> Result<Option<Deposit>, StoreError>;

    /// Insert a deposit, enforcing the uniqueness constraint over
    /// (listing, user, live status class). Two concurrent inserts for
    /// the same pair cannot both succeed.
    async fn insert_deposit(&self, deposit: &Deposit) -> Result<(), StoreError>;

    /// Look up a deposit by its payment order id.
    async fn deposit_by_order(&self, order: &OrderId) -> Result<Option<Deposit>, StoreError>;

    /// Atomically transition a deposit from `expected` to `to`, setting
    /// the gateway uid when provided. Returns `Stale` (with the current
    /// record) when the deposit is no longer in `expected`.
    async fn transition_deposit(
        &self,
        id: DepositId,
        expected: DepositStatus,
        to: DepositStatus,
        gateway_uid: Option<String>,
        now: u64,
    ) -> Result<DepositTransition, StoreError>;

    /// The current highest bid on a listing, if any.
    async fn highest_bid(&self, listing: ListingId) -> Result<Option<Bid>, StoreError>;

    /// Insert a bid under the ordering guard: fails `UniqueViolation`
    /// if the listing already holds a bid with an amount greater than
    /// or equal to the new bid's. Two concurrent inserts computed
    /// against the same highest bid cannot both commit.
    async fn insert_bid(&self, bid: &Bid) -> Result<(), StoreError>;

    /// All bids on a listing, in insertion order.
    async fn bids_for_listing(&self, listing: ListingId) -> Result<Vec<Bid>, StoreError>;

    /// The active (pending or accepted) offer for (listing, user), if any.
    async fn active_offer(
        &self,
        listing: ListingId,
        user: UserId,
    ) -> Result<Option<Offer>, StoreError>;

    /// Insert an offer, enforcing the uniqueness constraint over
    /// (listing, user, active status class).
    async fn insert_offer(&self, offer: &Offer) -> Result<(), StoreError>;

    /// All active offers on a listing.
    async fn active_offers(&self, listing: ListingId) -> Result<Vec<Offer>, StoreError>;
}
