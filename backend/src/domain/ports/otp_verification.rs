//! Driving port for the email passcode flow.

use async_trait::async_trait;

use crate::domain::{Email, OtpCode, OtpOutcome};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpVerification: Send + Sync {
    /// Generate, store and mail a fresh code for `email`.
    async fn issue(&self, email: &Email) -> OtpOutcome;

    /// Check a submitted code.
    async fn verify(&self, email: &Email, code: &OtpCode) -> OtpOutcome;

    /// Whether `email` carries an unconsumed verified mark.
    async fn is_verified(&self, email: &Email) -> bool;

    /// Consume the verified mark left by a successful [`Self::verify`].
    async fn consume_verification(&self, email: &Email) -> bool;
}
