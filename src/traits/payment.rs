//! Payment gateway abstraction and wire shapes.
//!
//! The gateway is an external card processor reached through a proxy;
//! request and response shapes mirror its JSON wire format
//! (camelCase field names, amounts in integer minor units).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::marketplace::OrderId;

/// Card data for a single payment attempt. Never persisted and never
/// logged; `Debug` redacts everything but the owner name.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    pub owner: String,
    pub number: String,
    pub month: String,
    pub year: String,
    pub cvv: String,
}

impl fmt::Debug for CardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardInfo")
            .field("owner", &self.owner)
            .field("number", &"<redacted>")
            .field("month", &"<redacted>")
            .field("year", &"<redacted>")
            .field("cvv", &"<redacted>")
            .finish()
    }
}

/// Customer details forwarded to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// One product line in the gateway order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub name: String,
    pub count: u32,
    pub unit_price_minor_units: u64,
}

/// Request body for creating a gateway payment, keyed by the deposit's
/// order id as the idempotency key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub return_url: String,
    pub order_id: OrderId,
    pub client_ip: String,
    pub amount_minor_units: u64,
    pub is_authed_installment1: bool,
    #[serde(rename = "is3DSecure")]
    pub is_3d_secure: bool,
    pub card_info: CardInfo,
    pub customer_info: CustomerInfo,
    pub products: Vec<ProductLine>,
}

/// Successful order creation: the redirect target for the payer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub payment_link: String,
}

/// Settled payment details attached to a callback or result query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub order_id: OrderId,
    /// Gateway transaction uid, kept for refund correlation.
    pub uid: String,
    pub amount: u64,
    pub net_amount: u64,
    pub auth_code: String,
    pub status: String,
    pub creation_time: String,
}

/// Result of the asynchronous payment, delivered by callback or fetched
/// through the result-query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    /// Whether the query itself succeeded.
    pub success: bool,
    /// Whether the charge went through.
    pub payment_successful: bool,
    pub payment_data: Option<PaymentData>,
}

/// Errors from the gateway proxy.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The proxy or processor could not be reached or errored out.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The gateway definitively rejected the request.
    #[error("gateway rejected request: {0}")]
    Rejected(String),
}

/// Abstraction over the external card-payment gateway proxy.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment order; returns the redirect link on success.
    /// Safe to retry with the same order id (gateway-side idempotency).
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentLink, GatewayError>;

    /// Query the settled result for an order, for poll/resume flows
    /// after an ambiguous timeout.
    async fn query_payment(&self, order: &OrderId) -> Result<PaymentResult, GatewayError>;
}
