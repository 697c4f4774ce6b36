use serde::{Deserialize, Serialize};

use super::ids::ListingId;

/// Whether a listing is sold by auction or by fixed-price offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    /// Open ascending auction with a minimum increment.
    Auction,
    /// Buy-now listing accepting purchase offers at a fixed price.
    Offer,
}

/// Temporal status of a listing, derived from its window and the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// The window has not opened yet.
    Upcoming,
    /// Inside the [start, end] window; writes are accepted.
    Active,
    /// The window has closed.
    Ended,
}

/// A time-boxed property listing.
///
/// Owned by the external catalog process and read-only to this crate;
/// all amounts are integer minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub kind: ListingKind,

    /// Human-readable property title, used in notification texts.
    pub title: String,

    /// Opening price for auction listings.
    pub starting_price: u64,

    /// Smallest amount a new bid must exceed the current highest by.
    /// Required for auction listings; validated at ledger entry.
    pub min_increment: u64,

    /// Asking price for offer listings.
    pub fixed_price: u64,

    /// Refundable deposit required to participate.
    pub deposit_amount: u64,

    /// Unix timestamp when the listing opens.
    pub start_time: u64,

    /// Unix timestamp when the listing closes.
    pub end_time: u64,
}

impl Listing {
    /// Derive the temporal status at a specific instant.
    ///
    /// Pure function of the listing window and `now`; every write path
    /// re-derives this server-side at commit time instead of trusting a
    /// client-supplied status.
    pub const fn status_at(&self, now: u64) -> LifecycleStatus {
        if now < self.start_time {
            LifecycleStatus::Upcoming
        } else if now > self.end_time {
            LifecycleStatus::Ended
        } else {
            LifecycleStatus::Active
        }
    }

    /// Seconds until the listing closes (0 once ended).
    pub const fn time_remaining_at(&self, now: u64) -> u64 {
        self.end_time.saturating_sub(now)
    }
}
