//! Payment reconciliation integration tests.

use propmarket::{DepositStatus, MarketError, MarketStore};

use crate::common::{card, client_ctx, failure_callback, success_callback, MarketHarness};

#[tokio::test]
async fn test_duplicate_success_callback_completes_once_then_bid_succeeds() {
    let h = MarketHarness::new();
    let listing = h.create_auction(100_000, 5_000).await;
    let user = h.register_user().await;

    let deposit = h.admission.begin_admission(listing.id, user).await.unwrap();
    h.orchestrator
        .create_order(&deposit, card(), client_ctx())
        .await
        .unwrap();

    // The gateway redelivers the same callback.
    let callback = success_callback(&deposit.order_id, "uid-cb");
    for _ in 0..2 {
        let status = h.orchestrator.reconcile(&callback).await.unwrap();
        assert_eq!(status, DepositStatus::Completed);
    }

    let settled = h
        .store
        .deposit_by_order(&deposit.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, DepositStatus::Completed);
    assert_eq!(settled.gateway_uid.as_deref(), Some("uid-cb"));

    let bid = h.bids.place_bid(listing.id, user).await.unwrap();
    assert_eq!(bid.amount, 100_000);
}

#[tokio::test]
async fn test_failed_payment_keeps_user_gated_and_allows_new_attempt() {
    let h = MarketHarness::new();
    let listing = h.create_auction(100_000, 5_000).await;
    let user = h.register_user().await;

    let deposit = h.admission.begin_admission(listing.id, user).await.unwrap();
    let status = h
        .orchestrator
        .reconcile(&failure_callback(&deposit.order_id, "uid-cb"))
        .await
        .unwrap();
    assert_eq!(status, DepositStatus::Failed);

    assert!(matches!(
        h.bids.place_bid(listing.id, user).await.unwrap_err(),
        MarketError::AdmissionRequired {
            pending_deposit: None
        }
    ));

    // A failed deposit never blocks starting over.
    h.admission.begin_admission(listing.id, user).await.unwrap();
}

#[tokio::test]
async fn test_callback_for_superseded_attempt_is_reported() {
    let h = MarketHarness::new();
    let listing = h.create_auction(100_000, 5_000).await;
    let user = h.register_user().await;

    let first = h.admission.begin_admission(listing.id, user).await.unwrap();
    let second = h.admission.begin_admission(listing.id, user).await.unwrap();

    // Success lands for the superseded first attempt: anomaly, and the
    // live attempt is untouched.
    let err = h
        .orchestrator
        .reconcile(&success_callback(&first.order_id, "uid-old"))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::ReconciliationAnomaly(_)));

    let live = h
        .store
        .deposit_by_order(&second.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.status, DepositStatus::Pending);
}

#[tokio::test]
async fn test_poll_after_timeout_settles_pending_deposit() {
    let h = MarketHarness::new();
    let listing = h.create_auction(100_000, 5_000).await;
    let user = h.register_user().await;

    let deposit = h.admission.begin_admission(listing.id, user).await.unwrap();

    // Nothing settled yet: poll reports pending.
    let status = h.orchestrator.poll_order(&deposit.order_id).await.unwrap();
    assert_eq!(status, DepositStatus::Pending);

    // The gateway settles; the next poll reconciles.
    h.gateway
        .script_result(
            &deposit.order_id,
            success_callback(&deposit.order_id, "uid-poll"),
        )
        .await;
    let status = h.orchestrator.poll_order(&deposit.order_id).await.unwrap();
    assert_eq!(status, DepositStatus::Completed);

    let bid = h.bids.place_bid(listing.id, user).await.unwrap();
    assert_eq!(bid.amount, 100_000);
}
