//! Account service implementing the [`Accounts`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Accounts, OtpVerification, UserPersistenceError, UserRepository};
use crate::domain::{
    Actor, Email, Error, LoginCredentials, NewUser, PasswordDigest, ProfileUpdate, Registration,
    Role, UserId, UserSummary,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => match field.as_str() {
            "email" => Error::conflict("Email already registered"),
            "phone" => Error::conflict("Phone already registered"),
            other => Error::conflict(format!("{other} already registered")),
        },
    }
}

/// Credentials for the administrator created at start-up.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: Email,
    pub password: String,
}

/// Registration, login and profile management.
#[derive(Clone)]
pub struct AccountService<U, V> {
    users: Arc<U>,
    otp: Arc<V>,
    require_email_verification: bool,
}

impl<U, V> AccountService<U, V> {
    pub fn new(users: Arc<U>, otp: Arc<V>) -> Self {
        Self {
            users,
            otp,
            require_email_verification: true,
        }
    }

    /// Allow registration without a prior passcode check.
    #[must_use]
    pub fn with_email_verification(mut self, required: bool) -> Self {
        self.require_email_verification = required;
        self
    }
}

impl<U, V> AccountService<U, V>
where
    U: UserRepository,
{
    /// Create the administrator if no account uses its email yet.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<UserSummary, Error> {
        if let Some(existing) = self
            .users
            .find_by_email(&seed.email)
            .await
            .map_err(map_user_error)?
        {
            return Ok(existing.summary());
        }
        let admin = self
            .users
            .insert(&NewUser {
                name: seed.name.clone(),
                email: seed.email.clone(),
                password: PasswordDigest::from_plaintext(&seed.password),
                role: Role::Admin,
                phone: None,
                verified: true,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %admin.id(), email = %admin.email(), "seeded admin account");
        Ok(admin.summary())
    }
}

#[async_trait]
impl<U, V> Accounts for AccountService<U, V>
where
    U: UserRepository,
    V: OtpVerification,
{
    async fn register(&self, registration: Registration) -> Result<UserSummary, Error> {
        if registration.role() == Role::Admin {
            return Err(Error::forbidden("admin accounts cannot be self-registered"));
        }
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(Error::conflict("Email already registered"));
        }
        if self.require_email_verification && !self.otp.is_verified(registration.email()).await {
            return Err(Error::forbidden("Email not verified"));
        }

        let user = self
            .users
            .insert(&NewUser {
                name: registration.name().to_owned(),
                email: registration.email().clone(),
                password: PasswordDigest::from_plaintext(registration.password()),
                role: registration.role(),
                phone: registration.phone().map(str::to_owned),
                verified: true,
            })
            .await
            .map_err(map_user_error)?;
        // The mark outlives a failed insert so the caller can retry.
        if self.require_email_verification {
            self.otp.consume_verification(registration.email()).await;
        }
        info!(user_id = %user.id(), role = %user.role(), "registered account");
        Ok(user.summary())
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserSummary, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .filter(|user| user.password().matches(credentials.password()))
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        Ok(user.summary())
    }

    async fn current_user(&self, id: UserId) -> Result<UserSummary, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.summary())
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    async fn update_profile(
        &self,
        actor: Actor,
        update: ProfileUpdate,
    ) -> Result<UserSummary, Error> {
        self.users
            .update_profile(actor.id, &update)
            .await
            .map_err(map_user_error)?
            .map(|user| user.summary())
            .ok_or_else(|| Error::not_found(format!("user {} not found", actor.id)))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
