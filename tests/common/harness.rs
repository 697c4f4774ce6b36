//! Shared test harness wiring the engine to mock collaborators.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use propmarket::mocks::{MockGateway, MockIdentity, MockSms, MockStore, MockTime};
use propmarket::traits::{CardInfo, CustomerInfo, PaymentData, PaymentResult};
use propmarket::{
    AdmissionControl, BidLedger, ClientContext, Contact, Deposit, Listing, ListingFeed,
    ListingId, ListingKind, NotificationDispatcher, OfferLedger, OrderId, PaymentOrchestrator,
    PhoneNumber, UserId,
};

/// Start-of-test clock value; listings open at 500 and close at 100_000
/// by default, so the engine starts inside the window.
pub const T0: u64 = 1_000;

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// One fully wired engine over shared mock collaborators.
pub struct MarketHarness {
    pub store: MockStore,
    pub gateway: MockGateway,
    pub sms: Arc<MockSms>,
    pub identity: Arc<MockIdentity>,
    pub time: MockTime,
    pub feed: Arc<ListingFeed>,
    pub admission: Arc<AdmissionControl<MockStore, MockTime>>,
    pub orchestrator: Arc<PaymentOrchestrator<MockStore, MockGateway, MockTime>>,
    pub bids: Arc<BidLedger<MockStore, MockTime, MockIdentity, MockSms>>,
    pub offers: Arc<OfferLedger<MockStore, MockTime, MockIdentity, MockSms>>,
    phone_counter: AtomicU64,
}

impl MarketHarness {
    pub fn new() -> Self {
        init_logging();
        let store = MockStore::new();
        let gateway = MockGateway::new();
        let sms = Arc::new(MockSms::new());
        let identity = Arc::new(MockIdentity::new());
        let time = MockTime::new(T0);
        let feed = Arc::new(ListingFeed::new());

        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            Arc::clone(&identity),
            Arc::clone(&sms),
        ));
        let admission = Arc::new(AdmissionControl::new(store.clone(), time.clone()));
        let orchestrator = Arc::new(
            PaymentOrchestrator::new(store.clone(), gateway.clone(), time.clone())
                .with_return_url("https://harness.test/payments/return"),
        );
        let bids = Arc::new(BidLedger::new(
            store.clone(),
            time.clone(),
            Arc::clone(&dispatcher),
            Arc::clone(&feed),
        ));
        let offers = Arc::new(OfferLedger::new(
            store.clone(),
            time.clone(),
            Arc::clone(&dispatcher),
            Arc::clone(&feed),
        ));

        Self {
            store,
            gateway,
            sms,
            identity,
            time,
            feed,
            admission,
            orchestrator,
            bids,
            offers,
            phone_counter: AtomicU64::new(1),
        }
    }

    /// Seed an auction listing open for the harness clock.
    pub async fn create_auction(&self, starting_price: u64, min_increment: u64) -> Listing {
        let listing = Listing {
            id: ListingId::new(),
            kind: ListingKind::Auction,
            title: "Harness auction lot".to_string(),
            starting_price,
            min_increment,
            fixed_price: 0,
            deposit_amount: 2_000,
            start_time: 500,
            end_time: 100_000,
        };
        self.store.seed_listing(listing.clone()).await;
        listing
    }

    /// Seed a buy-now listing open for the harness clock.
    pub async fn create_buy_now(&self, fixed_price: u64) -> Listing {
        let listing = Listing {
            id: ListingId::new(),
            kind: ListingKind::Offer,
            title: "Harness buy-now lot".to_string(),
            starting_price: 0,
            min_increment: 0,
            fixed_price,
            deposit_amount: 2_000,
            start_time: 500,
            end_time: 100_000,
        };
        self.store.seed_listing(listing.clone()).await;
        listing
    }

    /// Register a user with a unique phone number and notifications on.
    pub async fn register_user(&self) -> UserId {
        let user = UserId::new();
        let n = self.phone_counter.fetch_add(1, Ordering::SeqCst);
        let phone = PhoneNumber::parse(&format!("45{n:08}")).unwrap();
        self.identity
            .set_contact(
                user,
                Contact {
                    phone,
                    notifications_enabled: true,
                },
            )
            .await;
        user
    }

    /// Run the full deposit flow: begin admission, create the gateway
    /// order, and reconcile a successful callback.
    pub async fn pay_deposit(&self, listing: ListingId, user: UserId) -> Deposit {
        let deposit = self.admission.begin_admission(listing, user).await.unwrap();
        self.orchestrator
            .create_order(&deposit, card(), client_ctx())
            .await
            .unwrap();
        self.orchestrator
            .reconcile(&success_callback(
                &deposit.order_id,
                &format!("uid-{}", deposit.order_id),
            ))
            .await
            .unwrap();
        deposit
    }

    /// Poll until `pred` holds, for asserting on fire-and-forget
    /// side effects without coupling to their scheduling.
    pub async fn wait_until<F, Fut>(&self, mut pred: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..100 {
            if pred().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within timeout");
    }
}

/// A successful gateway callback for an order.
pub fn success_callback(order: &OrderId, uid: &str) -> PaymentResult {
    PaymentResult {
        success: true,
        payment_successful: true,
        payment_data: Some(PaymentData {
            order_id: order.clone(),
            uid: uid.to_string(),
            amount: 2_000,
            net_amount: 1_950,
            auth_code: "AUTH1".to_string(),
            status: "settled".to_string(),
            creation_time: "2024-01-01T00:00:00Z".to_string(),
        }),
    }
}

/// A declined gateway callback for an order.
pub fn failure_callback(order: &OrderId, uid: &str) -> PaymentResult {
    PaymentResult {
        payment_successful: false,
        ..success_callback(order, uid)
    }
}

pub fn card() -> CardInfo {
    CardInfo {
        owner: "Test Buyer".to_string(),
        number: "4111111111111111".to_string(),
        month: "12".to_string(),
        year: "2030".to_string(),
        cvv: "123".to_string(),
    }
}

pub fn client_ctx() -> ClientContext {
    ClientContext {
        ip: "203.0.113.7".to_string(),
        customer: CustomerInfo {
            name: "Test Buyer".to_string(),
            phone: "+4512345678".to_string(),
            email: "buyer@example.test".to_string(),
        },
    }
}
