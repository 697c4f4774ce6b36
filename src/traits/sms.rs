//! Outbound SMS gateway abstraction.

use anyhow::Result;
use async_trait::async_trait;

use crate::identity::PhoneNumber;

/// Category tag forwarded to the SMS gateway with each message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsKind {
    /// A bidder has been outranked on an auction listing.
    Outbid,
    /// Another offer landed on a listing the user holds an offer on.
    OfferUpdate,
}

/// Abstraction over the outbound text-delivery gateway.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Deliver one message. Best-effort from the caller's perspective;
    /// failures are logged, never propagated into ledger commits.
    async fn send_sms(&self, to: &PhoneNumber, message: &str, kind: SmsKind) -> Result<()>;
}
