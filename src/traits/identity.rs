//! Identity provider abstraction.
//!
//! Session issuance and OTP login live entirely on the provider's side;
//! this crate only resolves a validated user id to contact details.

use anyhow::Result;
use async_trait::async_trait;

use crate::identity::Contact;
use crate::marketplace::UserId;

/// Abstraction over the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve contact details for a user. `None` when the account has
    /// no phone on record.
    async fn contact(&self, user: UserId) -> Result<Option<Contact>>;
}
