//! Outbound capability for delivering one-time passcodes.

use async_trait::async_trait;

use crate::domain::{Email, OtpCode};

/// Sends a passcode to an email address.
///
/// Delivery failures are reported as `false`; adapters log the cause.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send(&self, to: &Email, code: &OtpCode) -> bool;
}
