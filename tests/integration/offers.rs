//! Offer ledger integration tests.

use std::sync::Arc;

use propmarket::{MarketError, MarketStore, OfferStatus};

use crate::common::MarketHarness;

#[tokio::test]
async fn test_offer_flow_from_deposit_to_pending_offer() {
    let h = MarketHarness::new();
    let listing = h.create_buy_now(500_000).await;
    let user = h.register_user().await;
    h.pay_deposit(listing.id, user).await;

    let offer = h
        .offers
        .submit_offer(listing.id, user, 490_000)
        .await
        .unwrap();
    assert_eq!(offer.status, OfferStatus::Pending);

    let active = h
        .store
        .active_offer(listing.id, user)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, offer.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_tabs_submitting_offers_one_wins() {
    let h = Arc::new(MarketHarness::new());
    let listing = h.create_buy_now(500_000).await;
    let user = h.register_user().await;
    h.pay_deposit(listing.id, user).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let h = Arc::clone(&h);
        handles.push(tokio::spawn(async move {
            h.offers.submit_offer(listing.id, user, 490_000).await
        }));
    }
    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(MarketError::DuplicateActiveOffer) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 1);

    let active = h.store.active_offers(listing.id).await.unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn test_rejected_offer_frees_the_active_slot() {
    let h = MarketHarness::new();
    let listing = h.create_buy_now(500_000).await;
    let user = h.register_user().await;
    h.pay_deposit(listing.id, user).await;

    let first = h
        .offers
        .submit_offer(listing.id, user, 480_000)
        .await
        .unwrap();
    assert!(matches!(
        h.offers.submit_offer(listing.id, user, 485_000).await,
        Err(MarketError::DuplicateActiveOffer)
    ));

    h.store
        .force_offer_status(first.id, OfferStatus::Rejected)
        .await;
    let second = h
        .offers
        .submit_offer(listing.id, user, 485_000)
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_offer_without_deposit_is_gated() {
    let h = MarketHarness::new();
    let listing = h.create_buy_now(500_000).await;
    let user = h.register_user().await;

    let err = h
        .offers
        .submit_offer(listing.id, user, 490_000)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::AdmissionRequired {
            pending_deposit: None
        }
    ));
}
