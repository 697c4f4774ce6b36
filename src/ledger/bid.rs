//! Bid ledger: monotonic strictly-increasing auction bids.
//!
//! Amounts are always computed server-side against the current highest
//! bid; the store's (listing, amount) ordering guard is what makes two
//! concurrent computations safe, the retry loop only smooths over the
//! benign case.

use std::sync::Arc;
use tracing::{info, warn};

use crate::admission::AdmissionControl;
use crate::config;
use crate::error::{MarketError, MarketResult};
use crate::feed::{ListingEvent, ListingFeed};
use crate::marketplace::{Bid, LifecycleStatus, Listing, ListingId, ListingKind, UserId};
use crate::notify::NotificationDispatcher;
use crate::traits::{IdentityProvider, MarketStore, SmsGateway, StoreError, TimeProvider};

/// Accepts auction bids behind the admission gate.
pub struct BidLedger<S, C, I, M>
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

impl<S, C, I, M> BidLedger<S, C, I, M>
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

    /// Place a bid on an active auction listing.
    ///
    /// The committed amount is `max(starting_price, highest + increment)`,
    /// never client-supplied. On an insert conflict the amount is
    /// recomputed against the now-current highest bid and retried once;
    /// persistent conflicts surface `ConflictRetry` to the caller.
    pub async fn place_bid(&self, listing_id: ListingId, user: UserId) -> MarketResult<Bid> {
        let listing = self
            .store
            .get_listing(listing_id)
            .await
            .map_err(store_internal)?
            .ok_or_else(|| MarketError::NotFound(format!("listing {listing_id}")))?;
        if listing.kind != ListingKind::Auction {
            return Err(MarketError::Validation(
                "listing does not accept auction bids".to_string(),
            ));
        }
        if listing.min_increment == 0 {
            return Err(MarketError::Validation(
                "listing has no valid minimum increment".to_string(),
            ));
        }

        // Lifecycle is re-derived server-side at the instant of commit.
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

        for attempt in 1..=config::BID_PLACE_MAX_ATTEMPTS {
            let highest = self
                .store
                .highest_bid(listing_id)
                .await
                .map_err(store_internal)?;
            let amount = match &highest {
                Some(h) => listing.starting_price.max(h.amount + listing.min_increment),
                None => listing.starting_price,
            };

            let bid = Bid::new(listing_id, user, amount, self.time.now_unix());
            match self.store.insert_bid(&bid).await {
                Ok(()) => {
                    info!(bid = %bid.id, %listing_id, bidder = %user, amount, "bid committed");
                    self.after_commit(&listing, &bid);
                    return Ok(bid);
                }
                Err(StoreError::UniqueViolation(constraint)) => {
                    warn!(%listing_id, bidder = %user, amount, constraint, attempt, "bid lost race");
                }
                Err(e) => return Err(store_internal(e)),
            }
        }
        Err(MarketError::ConflictRetry)
    }

    /// Post-commit side effects: feed publish plus fire-and-forget
    /// notification fan-out. Never awaited by the commit path.
    fn after_commit(&self, listing: &Listing, bid: &Bid) {
        self.feed.publish(
            listing.id,
            ListingEvent::BidAccepted {
                listing_id: listing.id,
                bidder_id: bid.bidder_id,
                amount: bid.amount,
            },
        );
        let dispatcher = Arc::clone(&self.dispatcher);
        let listing = listing.clone();
        let bid = bid.clone();
        tokio::spawn(async move {
            dispatcher.notify_outbid(&listing, &bid).await;
        });
    }
}

fn store_internal(e: StoreError) -> MarketError {
    MarketError::Internal(e.to_string())
}
