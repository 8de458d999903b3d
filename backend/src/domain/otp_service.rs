//! Email passcode service implementing the [`OtpVerification`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{OtpMailer, OtpVerification};
use crate::domain::{Email, OtpCode, OtpOutcome, OtpStore};

/// Default passcode lifetime.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Issues and checks passcodes held in a shared [`OtpStore`].
#[derive(Clone)]
pub struct OtpService<M: ?Sized> {
    store: Arc<OtpStore>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<M: ?Sized> OtpService<M> {
    pub fn new(store: Arc<OtpStore>, mailer: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            mailer,
            clock,
            ttl: Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    /// Override the passcode lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[async_trait]
impl<M> OtpVerification for OtpService<M>
where
    M: OtpMailer + ?Sized,
{
    async fn issue(&self, email: &Email) -> OtpOutcome {
        let code = OtpCode::generate(&mut rand::thread_rng());
        self.store
            .issue(email.clone(), code.clone(), self.clock.utc(), self.ttl);

        // The code stays stored on failure; a later verify can still use it.
        if self.mailer.send(email, &code).await {
            info!(email = %email, "otp issued");
            OtpOutcome::Sent
        } else {
            warn!(email = %email, "otp delivery failed");
            OtpOutcome::SendFailed
        }
    }

    async fn verify(&self, email: &Email, code: &OtpCode) -> OtpOutcome {
        let outcome = self.store.verify(email, code, self.clock.utc());
        info!(email = %email, outcome = ?outcome, "otp verification");
        outcome
    }

    async fn is_verified(&self, email: &Email) -> bool {
        self.store.is_verified(email)
    }

    async fn consume_verification(&self, email: &Email) -> bool {
        self.store.take_verified(email)
    }
}
