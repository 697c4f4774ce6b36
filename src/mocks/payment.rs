//! Mock payment gateway for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::marketplace::OrderId;
use crate::traits::{GatewayError, PaymentGateway, PaymentLink, PaymentRequest, PaymentResult};

#[derive(Debug, Default)]
struct MockGatewayInner {
    requests: RwLock<Vec<PaymentRequest>>,
    fail_creates: RwLock<bool>,
    hang_creates: RwLock<bool>,
    results: RwLock<HashMap<String, PaymentResult>>,
}

/// Mock gateway that records requests and serves scripted results.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    inner: Arc<MockGatewayInner>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_payment` fail with a simulated outage.
    pub async fn set_fail_creates(&self, fail: bool) {
        *self.inner.fail_creates.write().await = fail;
    }

    /// Make `create_payment` never resolve, simulating a stuck proxy.
    pub async fn set_hang_creates(&self, hang: bool) {
        *self.inner.hang_creates.write().await = hang;
    }

    /// Script the settled result returned for an order.
    pub async fn script_result(&self, order: &OrderId, result: PaymentResult) {
        self.inner
            .results
            .write()
            .await
            .insert(order.as_str().to_string(), result);
    }

    /// All payment requests received so far.
    pub async fn requests(&self) -> Vec<PaymentRequest> {
        self.inner.requests.read().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentLink, GatewayError> {
        self.inner.requests.write().await.push(request.clone());
        if *self.inner.hang_creates.read().await {
            std::future::pending::<()>().await;
        }
        if *self.inner.fail_creates.read().await {
            return Err(GatewayError::Unavailable(
                "simulated gateway outage".to_string(),
            ));
        }
        Ok(PaymentLink {
            payment_link: format!("https://gateway.test/pay/{}", request.order_id),
        })
    }

    async fn query_payment(&self, order: &OrderId) -> Result<PaymentResult, GatewayError> {
        match self.inner.results.read().await.get(order.as_str()) {
            Some(result) => Ok(result.clone()),
            // Not settled gateway-side yet.
            None => Ok(PaymentResult {
                success: true,
                payment_successful: false,
                payment_data: None,
            }),
        }
    }
}
