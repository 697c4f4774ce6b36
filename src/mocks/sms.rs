//! Mock SMS gateway for testing.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::identity::PhoneNumber;
use crate::traits::{SmsGateway, SmsKind};

/// A recorded delivery for test assertions.
#[derive(Debug, Clone)]
pub struct SentSms {
    pub to: PhoneNumber,
    pub message: String,
    pub kind: SmsKind,
}

#[derive(Debug, Default)]
struct MockSmsInner {
    sent: RwLock<Vec<SentSms>>,
    failing: RwLock<HashSet<PhoneNumber>>,
}

/// Mock SMS gateway that records deliveries and can fail per number.
#[derive(Debug, Clone, Default)]
pub struct MockSms {
    inner: Arc<MockSmsInner>,
}

impl MockSms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to one number fail.
    pub async fn fail_number(&self, number: PhoneNumber) {
        self.inner.failing.write().await.insert(number);
    }

    /// All messages delivered so far.
    pub async fn sent(&self) -> Vec<SentSms> {
        self.inner.sent.read().await.clone()
    }
}

#[async_trait]
impl SmsGateway for MockSms {
    async fn send_sms(&self, to: &PhoneNumber, message: &str, kind: SmsKind) -> Result<()> {
        if self.inner.failing.read().await.contains(to) {
            bail!("simulated SMS delivery failure to {to}");
        }
        self.inner.sent.write().await.push(SentSms {
            to: to.clone(),
            message: message.to_string(),
            kind,
        });
        Ok(())
    }
}
