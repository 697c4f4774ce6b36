use serde::{Deserialize, Serialize};

use super::ids::{DepositId, ListingId, OrderId, UserId};

/// Lifecycle state of a participation deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Payment attempt started, gateway outcome not yet known.
    Pending,
    /// Gateway confirmed the charge; the user is admitted.
    Completed,
    /// Payment failed or the attempt was superseded by a newer one.
    Failed,
    /// The deposit was returned after settlement.
    Refunded,
}

impl DepositStatus {
    /// Whether this status occupies the one live slot per (listing, user).
    ///
    /// The store enforces uniqueness over live deposits; `Failed` and
    /// `Refunded` never block a new payment attempt.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::Completed)
    }

    /// Whether the gateway outcome for this deposit is already known.
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Refunded)
    }
}

/// A refundable monetary hold a user pays to participate in one listing.
///
/// Created by admission control, transitioned only by payment
/// reconciliation, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub listing_id: ListingId,
    pub user_id: UserId,

    /// Deposit amount in minor currency units.
    pub amount: u64,

    pub status: DepositStatus,

    /// Idempotency key for the payment gateway; unique per attempt.
    pub order_id: OrderId,

    /// Gateway transaction uid, set once the callback settles the
    /// deposit. Kept for refund correlation.
    pub gateway_uid: Option<String>,

    pub created_at: u64,
    pub updated_at: u64,
}

impl Deposit {
    /// Create a fresh pending deposit with a newly minted order id.
    pub fn new_pending(listing_id: ListingId, user_id: UserId, amount: u64, now: u64) -> Self {
        Self {
            id: DepositId::new(),
            listing_id,
            user_id,
            amount,
            status: DepositStatus::Pending,
            order_id: OrderId::mint(),
            gateway_uid: None,
            created_at: now,
            updated_at: now,
        }
    }
}
