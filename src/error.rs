use crate::marketplace::{DepositId, LifecycleStatus};

/// Domain-specific error types for the bidding engine.
///
/// Every variant maps to exactly one corrective action for the caller:
/// pay the deposit, resume a pending payment, retry with fresh values,
/// wait, or stop.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Malformed client input, rejected before touching the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced listing or record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller has no completed deposit for this listing.
    ///
    /// Carries the pending deposit, if one exists, so the client can
    /// resume the payment instead of starting a second charge.
    #[error("a completed deposit is required before participating")]
    AdmissionRequired { pending_deposit: Option<DepositId> },

    /// A completed deposit already exists; starting a new payment is a
    /// hard stop, not a retry.
    #[error("deposit already completed for this listing")]
    AlreadyAdmitted,

    /// The listing is outside its bidding window.
    #[error("listing is not accepting bids (status: {0:?})")]
    NotAcceptingBids(LifecycleStatus),

    /// The user already holds a pending or accepted offer on this listing.
    #[error("an active offer already exists for this listing")]
    DuplicateActiveOffer,

    /// Lost a concurrent-update race; the caller should resubmit and let
    /// the server recompute against fresh state.
    #[error("concurrent update conflict, retry the request")]
    ConflictRetry,

    /// The payment gateway definitively rejected or failed the request.
    /// Retriable with backoff; the deposit is marked failed best-effort.
    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// The gateway call timed out with an ambiguous outcome. The deposit
    /// stays pending; the client must poll or resume, never assume failure.
    #[error("payment gateway timed out; poll the order result")]
    GatewayTimeout,

    /// A gateway callback that matches no known payment order. Logged and
    /// alerted, never silently dropped.
    #[error("no deposit matches payment order {0}")]
    ReconciliationAnomaly(String),

    /// Unexpected store or transaction failure.
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias.
pub type MarketResult<T> = Result<T, MarketError>;
