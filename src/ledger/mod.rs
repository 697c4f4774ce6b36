pub mod bid;
pub mod offer;

pub use bid::BidLedger;
pub use offer::OfferLedger;
