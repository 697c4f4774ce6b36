//! Notification fan-out integration tests.

use propmarket::PhoneNumber;

use crate::common::MarketHarness;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_outbid_participants_receive_sms_after_commit() {
    let h = MarketHarness::new();
    let listing = h.create_auction(100_000, 5_000).await;
    let (a, b) = (h.register_user().await, h.register_user().await);
    h.pay_deposit(listing.id, a).await;
    h.pay_deposit(listing.id, b).await;

    h.bids.place_bid(listing.id, a).await.unwrap();
    h.bids.place_bid(listing.id, b).await.unwrap();

    // Fan-out is fire-and-forget; wait for it to land.
    h.wait_until(|| async { !h.sms.sent().await.is_empty() }).await;

    let sent = h.sms.sent().await;
    assert_eq!(sent.len(), 1, "only the outranked bidder is notified");
    assert!(sent[0].message.contains("outbid"));
    assert!(sent[0].message.contains("1050.00"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delivery_failure_never_fails_the_commit() {
    let h = MarketHarness::new();
    let listing = h.create_auction(100_000, 5_000).await;
    let (a, b, c) = (
        h.register_user().await,
        h.register_user().await,
        h.register_user().await,
    );
    for user in [a, b, c] {
        h.pay_deposit(listing.id, user).await;
    }

    // First registered user gets phone 45_00000001; make it bounce.
    h.sms
        .fail_number(PhoneNumber::parse("4500000001").unwrap())
        .await;

    h.bids.place_bid(listing.id, a).await.unwrap();
    h.bids.place_bid(listing.id, b).await.unwrap();

    // The commit for C succeeds even while A's delivery keeps failing.
    let bid = h.bids.place_bid(listing.id, c).await.unwrap();
    assert_eq!(bid.amount, 110_000);

    // B still hears about being outbid by C.
    h.wait_until(|| async {
        h.sms
            .sent()
            .await
            .iter()
            .any(|m| m.message.contains("1100.00"))
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_other_offerers_notified_of_new_offer() {
    let h = MarketHarness::new();
    let listing = h.create_buy_now(500_000).await;
    let (a, b) = (h.register_user().await, h.register_user().await);
    h.pay_deposit(listing.id, a).await;
    h.pay_deposit(listing.id, b).await;

    h.offers.submit_offer(listing.id, a, 480_000).await.unwrap();
    h.offers.submit_offer(listing.id, b, 490_000).await.unwrap();

    h.wait_until(|| async { !h.sms.sent().await.is_empty() }).await;
    let sent = h.sms.sent().await;
    assert_eq!(sent.len(), 1, "only the other offerer is notified");
    assert!(sent[0].message.contains("new offer"));
}
