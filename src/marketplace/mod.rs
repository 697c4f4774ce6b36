pub mod bid;
pub mod deposit;
pub mod ids;
pub mod listing;
pub mod offer;

pub use bid::Bid;
pub use deposit::{Deposit, DepositStatus};
pub use ids::{BidId, DepositId, ListingId, OfferId, OrderId, UserId};
pub use listing::{LifecycleStatus, Listing, ListingKind};
pub use offer::{Offer, OfferStatus};
