//! Driving port for account use-cases.
//!
//! Inbound adapters call it to register, authenticate and load the caller
//! without importing persistence, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Actor, Error, LoginCredentials, ProfileUpdate, Registration, UserId, UserSummary};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Create an account. Admin accounts cannot be self-registered.
    async fn register(&self, registration: Registration) -> Result<UserSummary, Error>;

    /// Check credentials and return the matching account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserSummary, Error>;

    /// Load the account behind a session, failing with `unauthorized` when
    /// it no longer exists.
    async fn current_user(&self, id: UserId) -> Result<UserSummary, Error>;

    async fn update_profile(
        &self,
        actor: Actor,
        update: ProfileUpdate,
    ) -> Result<UserSummary, Error>;
}
