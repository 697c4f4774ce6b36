//! Admission control: gates bidding and offering on a completed deposit.
//!
//! Owns the deposit lifecycle up to the gateway handoff. The live-class
//! uniqueness constraint in the store is the real guard against two
//! tabs racing `begin_admission`; the pre-checks here only pick the
//! right domain error.

use tracing::{debug, info, warn};

use crate::config;
use crate::error::{MarketError, MarketResult};
use crate::marketplace::{Deposit, DepositStatus, ListingId, UserId};
use crate::traits::{DepositTransition, MarketStore, StoreError, TimeProvider};

/// Result of an admission check.
#[derive(Debug, Clone)]
pub struct Admission {
    /// True only when a completed deposit exists.
    pub admitted: bool,
    /// A live pending deposit, returned so the caller can resume the
    /// payment instead of double-charging.
    pub pending: Option<Deposit>,
}

/// Gate that requires a completed deposit before a user may participate.
pub struct AdmissionControl<S, C>
where
    S: MarketStore,
    C: TimeProvider,
{
    store: S,
    time: C,
}

impl<S, C> AdmissionControl<S, C>
where
    S: MarketStore,
    C: TimeProvider,
{
    pub const fn new(store: S, time: C) -> Self {
        Self { store, time }
    }

    /// Check whether a user is admitted to a listing.
    pub async fn check_admission(
        &self,
        listing: ListingId,
        user: UserId,
    ) -> MarketResult<Admission> {
        let live = self
            .store
            .live_deposit(listing, user)
            .await
            .map_err(store_internal)?;
        Ok(match live {
            Some(d) if d.status == DepositStatus::Completed => Admission {
                admitted: true,
                pending: None,
            },
            Some(d) => Admission {
                admitted: false,
                pending: Some(d),
            },
            None => Admission {
                admitted: false,
                pending: None,
            },
        })
    }

    /// Start a fresh payment attempt for a listing deposit.
    ///
    /// Any live pending deposit is superseded (transitioned to failed)
    /// first: a user holds at most one live payment attempt, and
    /// superseding avoids colliding with the live-class uniqueness
    /// constraint. Fails `AlreadyAdmitted` on an existing completed
    /// deposit; that is a hard stop, not a retry.
    pub async fn begin_admission(&self, listing: ListingId, user: UserId) -> MarketResult<Deposit> {
        let catalog_entry = self
            .store
            .get_listing(listing)
            .await
            .map_err(store_internal)?
            .ok_or_else(|| MarketError::NotFound(format!("listing {listing}")))?;
        let now = self.time.now_unix();

        for attempt in 1..=config::ADMISSION_INSERT_MAX_ATTEMPTS {
            match self
                .store
                .live_deposit(listing, user)
                .await
                .map_err(store_internal)?
            {
                Some(d) if d.status == DepositStatus::Completed => {
                    return Err(MarketError::AlreadyAdmitted);
                }
                Some(d) => self.supersede(d, now).await?,
                None => {}
            }

            let deposit =
                Deposit::new_pending(listing, user, catalog_entry.deposit_amount, now);
            match self.store.insert_deposit(&deposit).await {
                Ok(()) => {
                    info!(
                        deposit = %deposit.id,
                        order = %deposit.order_id,
                        %listing,
                        %user,
                        "created pending deposit"
                    );
                    return Ok(deposit);
                }
                Err(StoreError::UniqueViolation(constraint)) => {
                    // A concurrent tab slipped a live deposit in between
                    // the supersede and the insert. Re-read and go again.
                    warn!(%listing, %user, constraint, attempt, "deposit insert lost race");
                }
                Err(e) => return Err(store_internal(e)),
            }
        }
        Err(MarketError::ConflictRetry)
    }

    /// Transition a live pending deposit to failed ahead of a new attempt.
    async fn supersede(&self, deposit: Deposit, now: u64) -> MarketResult<()> {
        match self
            .store
            .transition_deposit(
                deposit.id,
                DepositStatus::Pending,
                DepositStatus::Failed,
                None,
                now,
            )
            .await
            .map_err(store_internal)?
        {
            DepositTransition::Applied(d) => {
                info!(deposit = %d.id, order = %d.order_id, "superseded pending deposit");
                Ok(())
            }
            DepositTransition::Stale(current)
                if current.status == DepositStatus::Completed =>
            {
                Err(MarketError::AlreadyAdmitted)
            }
            DepositTransition::Stale(current) => {
                // Already failed by a concurrent supersede; nothing to do.
                debug!(deposit = %current.id, status = ?current.status, "supersede was stale");
                Ok(())
            }
        }
    }
}

fn store_internal(e: StoreError) -> MarketError {
    MarketError::Internal(e.to_string())
}
