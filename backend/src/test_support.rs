//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Compiled
//! for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::OtpMailer;
use crate::domain::{Email, OtpCode};

mod memory;

pub use memory::InMemoryStore;

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Mailer that records every passcode instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(Email, OtpCode)>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose deliveries always fail, still recording the attempt.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// The most recent code addressed to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.lock_sent()
            .iter()
            .rev()
            .find(|(to, _)| to.as_ref() == email)
            .map(|(_, code)| code.as_str().to_owned())
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<(Email, OtpCode)>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send(&self, to: &Email, code: &OtpCode) -> bool {
        self.lock_sent().push((to.clone(), code.clone()));
        !self.fail
    }
}
