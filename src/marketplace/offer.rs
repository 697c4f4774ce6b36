use serde::{Deserialize, Serialize};

use super::ids::{ListingId, OfferId, UserId};

/// Decision state of a purchase offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Awaiting the seller-side decision.
    Pending,
    /// Accepted by the external decision process.
    Accepted,
    /// Rejected; the user may submit a new offer.
    Rejected,
}

impl OfferStatus {
    /// Whether this offer occupies the one active slot per (listing, user).
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

/// A purchase offer on a buy-now listing.
///
/// Created by the offer ledger; the accept/reject decision belongs to an
/// external process and is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub listing_id: ListingId,
    pub user_id: UserId,

    /// Offered amount in minor currency units.
    pub amount: u64,

    pub status: OfferStatus,
    pub created_at: u64,
}

impl Offer {
    pub fn new_pending(listing_id: ListingId, user_id: UserId, amount: u64, now: u64) -> Self {
        Self {
            id: OfferId::new(),
            listing_id,
            user_id,
            amount,
            status: OfferStatus::Pending,
            created_at: now,
        }
    }
}
