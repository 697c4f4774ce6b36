//! Mock identity provider for testing.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::identity::Contact;
use crate::marketplace::UserId;
use crate::traits::IdentityProvider;

/// Mock identity provider backed by an in-memory contact table.
#[derive(Debug, Clone, Default)]
pub struct MockIdentity {
    contacts: Arc<RwLock<HashMap<UserId, Contact>>>,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register contact details for a user.
    pub async fn set_contact(&self, user: UserId, contact: Contact) {
        self.contacts.write().await.insert(user, contact);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn contact(&self, user: UserId) -> Result<Option<Contact>> {
        Ok(self.contacts.read().await.get(&user).cloned())
    }
}
