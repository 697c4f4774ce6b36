//! Notification dispatch: derives outranked participants from the
//! ledger after a commit and fans out SMS delivery.
//!
//! Dispatch is best-effort throughout. One recipient failing never
//! affects the others, and nothing here can roll back or delay the
//! ledger commit that triggered it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config;
use crate::marketplace::{Bid, Listing, Offer, UserId};
use crate::traits::{IdentityProvider, MarketStore, SmsGateway, SmsKind};

/// Render a minor-unit amount as a major-unit decimal string.
fn format_amount(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}

/// Computes notification recipients from ledger state and dispatches
/// through the SMS gateway with bounded concurrency.
pub struct NotificationDispatcher<S, I, M>
where
    S: MarketStore,
    I: IdentityProvider + 'static,
    M: SmsGateway + 'static,
{
    store: S,
    identity: Arc<I>,
    sms: Arc<M>,
    limiter: Arc<Semaphore>,
}

impl<S, I, M> NotificationDispatcher<S, I, M>
where
    S: MarketStore,
    I: IdentityProvider + 'static,
    M: SmsGateway + 'static,
{
    pub fn new(store: S, identity: Arc<I>, sms: Arc<M>) -> Self {
        Self {
            store,
            identity,
            sms,
            limiter: Arc::new(Semaphore::new(config::NOTIFY_MAX_CONCURRENT)),
        }
    }

    /// Notify every bidder now outranked by a freshly committed bid.
    ///
    /// The recipient set comes from the ledger, never from client
    /// state: all bidders with an amount below the new one, deduped,
    /// minus the new bidder.
    pub async fn notify_outbid(&self, listing: &Listing, new_bid: &Bid) {
        let bids = match self.store.bids_for_listing(listing.id).await {
            Ok(bids) => bids,
            Err(e) => {
                warn!(listing = %listing.id, error = %e, "could not load bids for fan-out");
                return;
            }
        };
        let mut outranked: Vec<UserId> = Vec::new();
        for bid in &bids {
            if bid.amount < new_bid.amount
                && bid.bidder_id != new_bid.bidder_id
                && !outranked.contains(&bid.bidder_id)
            {
                outranked.push(bid.bidder_id);
            }
        }

        let message = format!(
            "You have been outbid on \"{}\". The highest bid is now {}.",
            listing.title,
            format_amount(new_bid.amount)
        );
        self.fan_out(outranked, message, SmsKind::Outbid).await;
    }

    /// Notify other users holding an active offer on the same listing.
    pub async fn notify_offer_submitted(&self, listing: &Listing, new_offer: &Offer) {
        let offers = match self.store.active_offers(listing.id).await {
            Ok(offers) => offers,
            Err(e) => {
                warn!(listing = %listing.id, error = %e, "could not load offers for fan-out");
                return;
            }
        };
        let mut others: Vec<UserId> = Vec::new();
        for offer in &offers {
            if offer.user_id != new_offer.user_id && !others.contains(&offer.user_id) {
                others.push(offer.user_id);
            }
        }

        let message = format!(
            "A new offer was made on \"{}\", which you also hold an offer on.",
            listing.title
        );
        self.fan_out(others, message, SmsKind::OfferUpdate).await;
    }

    /// Deliver one message to each recipient in parallel tasks bounded
    /// by the concurrency limiter, each with its own send timeout.
    async fn fan_out(&self, recipients: Vec<UserId>, message: String, kind: SmsKind) {
        if recipients.is_empty() {
            return;
        }
        debug!(count = recipients.len(), ?kind, "dispatching notifications");

        let mut handles = Vec::with_capacity(recipients.len());
        for user in recipients {
            let identity = Arc::clone(&self.identity);
            let sms = Arc::clone(&self.sms);
            let limiter = Arc::clone(&self.limiter);
            let message = message.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                let contact = match identity.contact(user).await {
                    Ok(Some(contact)) => contact,
                    Ok(None) => {
                        debug!(%user, "no contact on record, skipping");
                        return;
                    }
                    Err(e) => {
                        warn!(%user, error = %e, "contact resolution failed");
                        return;
                    }
                };
                if !contact.notifications_enabled {
                    debug!(%user, "notifications disabled, skipping");
                    return;
                }
                let send = sms.send_sms(&contact.phone, &message, kind);
                match timeout(Duration::from_secs(config::NOTIFY_SEND_TIMEOUT_SECS), send).await
                {
                    Ok(Ok(())) => debug!(%user, "notification delivered"),
                    Ok(Err(e)) => warn!(%user, error = %e, "notification delivery failed"),
                    Err(_) => warn!(%user, "notification delivery timed out"),
                }
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }
    }
}
