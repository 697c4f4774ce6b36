use serde::{Deserialize, Serialize};

use super::ids::{BidId, ListingId, UserId};

/// An accepted auction bid.
///
/// Append-only: once committed to the ledger a bid is never mutated or
/// deleted. The amount is always server-computed, never client-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub listing_id: ListingId,
    pub bidder_id: UserId,

    /// Bid amount in minor currency units.
    pub amount: u64,

    pub created_at: u64,
}

impl Bid {
    pub fn new(listing_id: ListingId, bidder_id: UserId, amount: u64, now: u64) -> Self {
        Self {
            id: BidId::new(),
            listing_id,
            bidder_id,
            amount,
            created_at: now,
        }
    }
}
