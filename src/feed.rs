//! Per-listing server-push event feed.
//!
//! Ledger commits publish here so clients can subscribe instead of
//! polling. The feed is a lossy broadcast: a lagged subscriber re-reads
//! the ledger; ordering decisions never come from the feed.

use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config;
use crate::marketplace::{ListingId, UserId};

/// Event published after a successful ledger commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEvent {
    /// A new highest bid was committed.
    BidAccepted {
        listing_id: ListingId,
        bidder_id: UserId,
        amount: u64,
    },
    /// A new offer was submitted.
    OfferSubmitted {
        listing_id: ListingId,
        user_id: UserId,
        amount: u64,
    },
}

/// Registry of broadcast channels, one per listing with subscribers.
#[derive(Default)]
pub struct ListingFeed {
    channels: RwLock<HashMap<ListingId, broadcast::Sender<ListingEvent>>>,
}

impl ListingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events for one listing.
    pub fn subscribe(&self, listing: ListingId) -> broadcast::Receiver<ListingEvent> {
        let mut channels = self.channels.write();
        channels
            .entry(listing)
            .or_insert_with(|| broadcast::channel(config::LISTING_FEED_BUFFER).0)
            .subscribe()
    }

    /// Publish an event to a listing's subscribers, if any.
    pub fn publish(&self, listing: ListingId, event: ListingEvent) {
        let channels = self.channels.read();
        if let Some(sender) = channels.get(&listing) {
            // Send only fails when every receiver is gone; that is fine.
            let delivered = sender.send(event).unwrap_or(0);
            debug!(%listing, delivered, "published listing event");
        }
    }

    /// Drop the channel for a listing once it has ended.
    pub fn remove(&self, listing: ListingId) {
        self.channels.write().remove(&listing);
    }
}
