//! Identifier newtypes for the domain entities.
//!
//! Every entity is keyed by a UUID wrapped in its own type so a bid id
//! can never be passed where a listing id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id!(
    /// Identifies a property listing (owned by the external catalog).
    ListingId
);
uuid_id!(
    /// Identifies a user account validated by the identity provider.
    UserId
);
uuid_id!(
    /// Identifies a deposit record.
    DepositId
);
uuid_id!(
    /// Identifies an accepted bid.
    BidId
);
uuid_id!(
    /// Identifies a submitted offer.
    OfferId
);

/// Payment order identifier used as the idempotency key towards the
/// payment gateway. Collision-resistant: a fresh UUIDv4 per attempt,
/// rendered without hyphens the way the gateway expects order ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Mint a new order id for a payment attempt.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
