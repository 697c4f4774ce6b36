//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions
//! that allow unit testing without external dependencies.

pub mod identity;
pub mod payment;
pub mod sms;
pub mod store;
pub mod time;

pub use identity::MockIdentity;
pub use payment::MockGateway;
pub use sms::{MockSms, SentSms};
pub use store::{MockStore, MockStoreFailure};
pub use time::MockTime;
