//! Offer ledger: at most one active offer per (listing, user).
//!
//! The store's (listing, user, active-class) uniqueness constraint is
//! the source of truth; the pre-check only short-circuits the common
//! duplicate before a doomed insert.

use std::sync::Arc;
use tracing::{info, warn};

use crate::admission::AdmissionControl;
use crate::error::{MarketError, MarketResult};
use crate::feed::{ListingEvent, ListingFeed};
use crate::marketplace::{LifecycleStatus, Listing, ListingId, ListingKind, Offer, UserId};
use crate::notify::NotificationDispatcher;
use crate::traits::{IdentityProvider, MarketStore, SmsGateway, StoreError, TimeProvider};

/// Accepts purchase offers on buy-now listings behind the admission gate.
pub struct OfferLedger<S, C, I, M>
where
    S: MarketStore,
    C: TimeProvider + Clone,
    I: IdentityProvider + 'static,
    M: SmsGateway + 'static,
{
    store: S,
    time: C,
    admission: AdmissionControl<S, C>,
    dispatcher: Arc<NotificationDispatcher<S, I, M>>,
    feed: Arc<ListingFeed>,
}

impl<S, C, I, M> OfferLedger<S, C, I, M>
where
    S: MarketStore,
    C: TimeProvider + Clone + 'static,
    I: IdentityProvider + 'static,
    M: SmsGateway + 'static,
{
    pub fn new(
        store: S,
        time: C,
        dispatcher: Arc<NotificationDispatcher<S, I, M>>,
        feed: Arc<ListingFeed>,
    ) -> Self {
        let admission = AdmissionControl::new(store.clone(), time.clone());
        Self {
            store,
            time,
            admission,
            dispatcher,
            feed,
        }
    }

    /// Submit a purchase offer on an offer-type listing.
    pub async fn submit_offer(
        &self,
        listing_id: ListingId,
        user: UserId,
        amount: u64,
    ) -> MarketResult<Offer> {
        if amount == 0 {
            return Err(MarketError::Validation(
                "offer amount must be at least 1".to_string(),
            ));
        }
        let listing = self
            .store
            .get_listing(listing_id)
            .await
            .map_err(store_internal)?
            .ok_or_else(|| MarketError::NotFound(format!("listing {listing_id}")))?;
        if listing.kind != ListingKind::Offer {
            return Err(MarketError::Validation(
                "listing does not accept purchase offers".to_string(),
            ));
        }
        let status = listing.status_at(self.time.now_unix());
        if status != LifecycleStatus::Active {
            return Err(MarketError::NotAcceptingBids(status));
        }

        let admission = self.admission.check_admission(listing_id, user).await?;
        if !admission.admitted {
            return Err(MarketError::AdmissionRequired {
                pending_deposit: admission.pending.map(|d| d.id),
            });
        }

        // Advisory fast path; the insert constraint is the real guard.
        if self
            .store
            .active_offer(listing_id, user)
            .await
            .map_err(store_internal)?
            .is_some()
        {
            return Err(MarketError::DuplicateActiveOffer);
        }

        let offer = Offer::new_pending(listing_id, user, amount, self.time.now_unix());
        match self.store.insert_offer(&offer).await {
            Ok(()) => {
                info!(offer = %offer.id, %listing_id, %user, amount, "offer committed");
                self.after_commit(&listing, &offer);
                Ok(offer)
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                warn!(%listing_id, %user, constraint, "concurrent duplicate offer");
                Err(MarketError::DuplicateActiveOffer)
            }
            Err(e) => Err(store_internal(e)),
        }
    }

    /// Post-commit side effects, never awaited by the commit path.
    fn after_commit(&self, listing: &Listing, offer: &Offer) {
        self.feed.publish(
            listing.id,
            ListingEvent::OfferSubmitted {
                listing_id: listing.id,
                user_id: offer.user_id,
                amount: offer.amount,
            },
        );
        let dispatcher = Arc::clone(&self.dispatcher);
        let listing = listing.clone();
        let offer = offer.clone();
        tokio::spawn(async move {
            dispatcher.notify_offer_submitted(&listing, &offer).await;
        });
    }
}

fn store_internal(e: StoreError) -> MarketError {
    MarketError::Internal(e.to_string())
}
