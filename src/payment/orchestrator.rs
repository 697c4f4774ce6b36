//! Payment orchestration: gateway order construction and callback
//! reconciliation.
//!
//! Deposits are settled exclusively here; ledger writes never touch
//! deposit state. Reconciliation is idempotent under the gateway's
//! at-least-once callback delivery.

use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config;
use crate::error::{MarketError, MarketResult};
use crate::marketplace::{Deposit, DepositStatus, OrderId};
use crate::traits::{
    CardInfo, CustomerInfo, DepositTransition, MarketStore, PaymentGateway, PaymentLink,
    PaymentRequest, PaymentResult, ProductLine, StoreError, TimeProvider,
};

/// Per-request client details forwarded to the gateway.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub ip: String,
    pub customer: CustomerInfo,
}

/// Builds gateway orders and reconciles asynchronous payment results
/// into deposit state transitions.
pub struct PaymentOrchestrator<S, G, C>
where
    S: MarketStore,
    G: PaymentGateway,
    C: TimeProvider,
{
    store: S,
    gateway: G,
    time: C,
    return_url_base: String,
}

impl<S, G, C> PaymentOrchestrator<S, G, C>
where
    S: MarketStore,
    G: PaymentGateway,
    C: TimeProvider,
{
    pub fn new(store: S, gateway: G, time: C) -> Self {
        Self {
            store,
            gateway,
            time,
            return_url_base: config::payment_return_url(),
        }
    }

    /// Override the return-URL base (tests, alternate deployments).
    pub fn with_return_url(mut self, base: impl Into<String>) -> Self {
        self.return_url_base = base.into();
        self
    }

    /// Create a gateway payment order for a pending deposit.
    ///
    /// The deposit's order id is the idempotency key; the return URL
    /// encodes it so the redirect flow can resume the right order. On a
    /// definitive gateway error the deposit is marked failed
    /// best-effort and the original error is surfaced. On an ambiguous
    /// timeout the deposit stays pending: the charge may have succeeded
    /// gateway-side, so the caller must poll, never assume failure.
    pub async fn create_order(
        &self,
        deposit: &Deposit,
        card: CardInfo,
        ctx: ClientContext,
    ) -> MarketResult<PaymentLink> {
        if deposit.status != DepositStatus::Pending {
            return Err(MarketError::Validation(format!(
                "deposit {} is not pending",
                deposit.id
            )));
        }
        let request = self.build_request(deposit, card, ctx);

        let call = self.gateway.create_payment(&request);
        match timeout(Duration::from_secs(config::GATEWAY_REQUEST_TIMEOUT_SECS), call).await {
            Ok(Ok(link)) => {
                info!(order = %deposit.order_id, "gateway order created");
                Ok(link)
            }
            Ok(Err(e)) => {
                warn!(order = %deposit.order_id, error = %e, "gateway rejected order");
                self.mark_failed_best_effort(deposit).await;
                Err(MarketError::GatewayUnavailable(e.to_string()))
            }
            Err(_) => {
                warn!(order = %deposit.order_id, "gateway call timed out, deposit stays pending");
                Err(MarketError::GatewayTimeout)
            }
        }
    }

    /// Apply an asynchronous gateway result to the matching deposit.
    ///
    /// Idempotent: replaying the same callback leaves the deposit
    /// unchanged. A callback that matches no order, or that conflicts
    /// with an already-settled transaction uid, is a reportable anomaly.
    pub async fn reconcile(&self, callback: &PaymentResult) -> MarketResult<DepositStatus> {
        let data = callback.payment_data.as_ref().ok_or_else(|| {
            error!("gateway callback carried no payment data");
            MarketError::ReconciliationAnomaly("<missing payment data>".to_string())
        })?;

        let deposit = self
            .store
            .deposit_by_order(&data.order_id)
            .await
            .map_err(store_internal)?
            .ok_or_else(|| {
                error!(order = %data.order_id, uid = %data.uid, "callback matches no deposit");
                MarketError::ReconciliationAnomaly(data.order_id.to_string())
            })?;

        let target = if callback.success && callback.payment_successful {
            DepositStatus::Completed
        } else {
            DepositStatus::Failed
        };
        let now = self.time.now_unix();

        match self
            .store
            .transition_deposit(
                deposit.id,
                DepositStatus::Pending,
                target,
                Some(data.uid.clone()),
                now,
            )
            .await
            .map_err(store_internal)?
        {
            DepositTransition::Applied(d) => {
                info!(
                    deposit = %d.id,
                    order = %d.order_id,
                    uid = %data.uid,
                    status = ?d.status,
                    "deposit settled"
                );
                Ok(d.status)
            }
            DepositTransition::Stale(current) => self.resolve_stale(&current, target, &data.uid),
        }
    }

    /// Fetch the settled result for an order and reconcile it.
    ///
    /// Poll/resume path for clients left with a pending deposit after
    /// an ambiguous timeout.
    pub async fn poll_order(&self, order: &OrderId) -> MarketResult<DepositStatus> {
        let call = self.gateway.query_payment(order);
        let result =
            match timeout(Duration::from_secs(config::GATEWAY_REQUEST_TIMEOUT_SECS), call).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => return Err(MarketError::GatewayUnavailable(e.to_string())),
                Err(_) => return Err(MarketError::GatewayTimeout),
            };
        if result.payment_data.is_none() {
            // Not settled gateway-side yet; keep polling.
            debug!(%order, "order not settled yet");
            return Ok(DepositStatus::Pending);
        }
        self.reconcile(&result).await
    }

    /// Decide what a stale compare-and-set means for this callback.
    fn resolve_stale(
        &self,
        current: &Deposit,
        target: DepositStatus,
        uid: &str,
    ) -> MarketResult<DepositStatus> {
        if current.status == target {
            return match target {
                DepositStatus::Completed => {
                    if current.gateway_uid.as_deref() == Some(uid) {
                        debug!(deposit = %current.id, %uid, "duplicate callback, no-op");
                        Ok(current.status)
                    } else {
                        error!(
                            deposit = %current.id,
                            stored_uid = ?current.gateway_uid,
                            callback_uid = %uid,
                            "conflicting transaction uid on settled deposit"
                        );
                        Err(MarketError::ReconciliationAnomaly(
                            current.order_id.to_string(),
                        ))
                    }
                }
                // A failure replay, or a failure callback for an attempt
                // already superseded locally. Either way nothing to apply.
                _ => Ok(current.status),
            };
        }

        // Status disagreement: a success callback for a superseded or
        // refunded deposit, or a failure after a recorded success. The
        // stray charge needs the manual refund path, never an automatic
        // status flip.
        error!(
            deposit = %current.id,
            order = %current.order_id,
            current = ?current.status,
            callback = ?target,
            %uid,
            "callback conflicts with settled deposit state"
        );
        Err(MarketError::ReconciliationAnomaly(
            current.order_id.to_string(),
        ))
    }

    fn build_request(&self, deposit: &Deposit, card: CardInfo, ctx: ClientContext) -> PaymentRequest {
        PaymentRequest {
            return_url: format!(
                "{}?orderId={}",
                self.return_url_base, deposit.order_id
            ),
            order_id: deposit.order_id.clone(),
            client_ip: ctx.ip,
            amount_minor_units: deposit.amount,
            is_authed_installment1: true,
            is_3d_secure: true,
            card_info: card,
            customer_info: ctx.customer,
            products: vec![ProductLine {
                name: "Listing participation deposit".to_string(),
                count: 1,
                unit_price_minor_units: deposit.amount,
            }],
        }
    }

    /// Mark the deposit failed after a definitive gateway error. A
    /// failure here is logged and swallowed so the original gateway
    /// error still reaches the caller.
    async fn mark_failed_best_effort(&self, deposit: &Deposit) {
        let now = self.time.now_unix();
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
        {
            Ok(DepositTransition::Applied(_)) => {}
            Ok(DepositTransition::Stale(current)) => {
                debug!(deposit = %current.id, status = ?current.status, "mark-failed was stale");
            }
            Err(e) => {
                warn!(deposit = %deposit.id, error = %e, "failed to mark deposit failed");
            }
        }
    }
}

fn store_internal(e: StoreError) -> MarketError {
    MarketError::Internal(e.to_string())
}
