//! In-memory mock store for testing.
//!
//! Reproduces the production store's transactional guarantees: each
//! method takes the relevant table's write lock for its whole critical
//! section, so the uniqueness checks and the insert are atomic exactly
//! as a database constraint would be.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::marketplace::{
    Bid, Deposit, DepositId, DepositStatus, Listing, ListingId, Offer, OfferId, OfferStatus,
    OrderId, UserId,
};
use crate::traits::{DepositTransition, MarketStore, StoreError};

/// Types of failures that can be simulated.
#[derive(Debug, Clone)]
pub enum MockStoreFailure {
    /// Fail every operation with a backend error.
    All,
    /// Force a uniqueness conflict on every bid insert.
    BidInsertConflict,
}

#[derive(Debug, Default)]
struct MockStoreInner {
    listings: RwLock<HashMap<ListingId, Listing>>,
    deposits: RwLock<Vec<Deposit>>,
    bids: RwLock<Vec<Bid>>,
    offers: RwLock<Vec<Offer>>,
    failure: RwLock<Option<MockStoreFailure>>,
}

/// Mock relational store backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    inner: Arc<MockStoreInner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure simulated failures (`None` restores normal operation).
    pub async fn set_failure(&self, failure: Option<MockStoreFailure>) {
        *self.inner.failure.write().await = failure;
    }

    /// Seed a catalog listing.
    pub async fn seed_listing(&self, listing: Listing) {
        self.inner.listings.write().await.insert(listing.id, listing);
    }

    /// Seed a bid directly, bypassing the ordering guard.
    pub async fn seed_bid(&self, bid: Bid) {
        self.inner.bids.write().await.push(bid);
    }

    /// Seed an offer directly, bypassing the active-class constraint.
    pub async fn seed_offer(&self, offer: Offer) {
        self.inner.offers.write().await.push(offer);
    }

    /// Force a deposit into a status, bypassing transition rules.
    pub async fn force_deposit_status(&self, id: DepositId, status: DepositStatus) {
        let mut deposits = self.inner.deposits.write().await;
        if let Some(d) = deposits.iter_mut().find(|d| d.id == id) {
            d.status = status;
        }
    }

    /// Force an offer into a status, standing in for the external
    /// accept/reject decision process.
    pub async fn force_offer_status(&self, id: OfferId, status: OfferStatus) {
        let mut offers = self.inner.offers.write().await;
        if let Some(o) = offers.iter_mut().find(|o| o.id == id) {
            o.status = status;
        }
    }

    /// Every deposit recorded for a (listing, user) pair, any status.
    pub async fn deposits_for(&self, listing: ListingId, user: UserId) -> Vec<Deposit> {
        self.inner
            .deposits
            .read()
            .await
            .iter()
            .filter(|d| d.listing_id == listing && d.user_id == user)
            .cloned()
            .collect()
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        if matches!(*self.inner.failure.read().await, Some(MockStoreFailure::All)) {
            return Err(StoreError::Backend("simulated backend failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketStore for MockStore {
    async fn get_listing(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        self.check_failure().await?;
        Ok(self.inner.listings.read().await.get(&id).cloned())
    }

    async fn live_deposit(
        &self,
        listing: ListingId,
        user: UserId,
    ) -> Result<Option<Deposit>, StoreError> {
        self.check_failure().await?;
        Ok(self
            .inner
            .deposits
            .read()
            .await
            .iter()
            .find(|d| d.listing_id == listing && d.user_id == user && d.status.is_live())
            .cloned())
    }

    async fn insert_deposit(&self, deposit: &Deposit) -> Result<(), StoreError> {
        self.check_failure().await?;
        let mut deposits = self.inner.deposits.write().await;
        let duplicate = deposits.iter().any(|d| {
            d.listing_id == deposit.listing_id
                && d.user_id == deposit.user_id
                && d.status.is_live()
        });
        if duplicate {
            return Err(StoreError::UniqueViolation("deposit_live_per_listing_user"));
        }
        deposits.push(deposit.clone());
        Ok(())
    }

    async fn deposit_by_order(&self, order: &OrderId) -> Result<Option<Deposit>, StoreError> {
        self.check_failure().await?;
        Ok(self
            .inner
            .deposits
            .read()
            .await
            .iter()
            .find(|d| &d.order_id == order)
            .cloned())
    }

    async fn transition_deposit(
        &self,
        id: DepositId,
        expected: DepositStatus,
        to: DepositStatus,
        gateway_uid: Option<String>,
        now: u64,
    ) -> Result<DepositTransition, StoreError> {
        self.check_failure().await?;
        let mut deposits = self.inner.deposits.write().await;
        let deposit = deposits
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("deposit {id}")))?;
        if deposit.status != expected {
            return Ok(DepositTransition::Stale(deposit.clone()));
        }
        deposit.status = to;
        if gateway_uid.is_some() {
            deposit.gateway_uid = gateway_uid;
        }
        deposit.updated_at = now;
        Ok(DepositTransition::Applied(deposit.clone()))
    }

    async fn highest_bid(&self, listing: ListingId) -> Result<Option<Bid>, StoreError> {
        self.check_failure().await?;
        Ok(self
            .inner
            .bids
            .read()
            .await
            .iter()
            .filter(|b| b.listing_id == listing)
            .max_by_key(|b| b.amount)
            .cloned())
    }

    async fn insert_bid(&self, bid: &Bid) -> Result<(), StoreError> {
        self.check_failure().await?;
        if matches!(
            *self.inner.failure.read().await,
            Some(MockStoreFailure::BidInsertConflict)
        ) {
            return Err(StoreError::UniqueViolation("bid_listing_amount"));
        }
        let mut bids = self.inner.bids.write().await;
        let outranked = bids
            .iter()
            .any(|b| b.listing_id == bid.listing_id && b.amount >= bid.amount);
        if outranked {
            return Err(StoreError::UniqueViolation("bid_listing_amount"));
        }
        bids.push(bid.clone());
        Ok(())
    }

    async fn bids_for_listing(&self, listing: ListingId) -> Result<Vec<Bid>, StoreError> {
        self.check_failure().await?;
        Ok(self
            .inner
            .bids
            .read()
            .await
            .iter()
            .filter(|b| b.listing_id == listing)
            .cloned()
            .collect())
    }

    async fn active_offer(
        &self,
        listing: ListingId,
        user: UserId,
    ) -> Result<Option<Offer>, StoreError> {
        self.check_failure().await?;
        Ok(self
            .inner
            .offers
            .read()
            .await
            .iter()
            .find(|o| o.listing_id == listing && o.user_id == user && o.status.is_active())
            .cloned())
    }

    async fn insert_offer(&self, offer: &Offer) -> Result<(), StoreError> {
        self.check_failure().await?;
        let mut offers = self.inner.offers.write().await;
        let duplicate = offers.iter().any(|o| {
            o.listing_id == offer.listing_id
                && o.user_id == offer.user_id
                && o.status.is_active()
        });
        if duplicate {
            return Err(StoreError::UniqueViolation("offer_active_per_listing_user"));
        }
        offers.push(offer.clone());
        Ok(())
    }

    async fn active_offers(&self, listing: ListingId) -> Result<Vec<Offer>, StoreError> {
        self.check_failure().await?;
        Ok(self
            .inner
            .offers
            .read()
            .await
            .iter()
            .filter(|o| o.listing_id == listing && o.status.is_active())
            .cloned()
            .collect())
    }
}
