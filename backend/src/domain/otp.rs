//! One-time passcodes for email verification.
//!
//! Per email the store moves `none -> issued -> {consumed | expired}`.
//! Issuing again overwrites the previous code. The store never reads the
//! clock itself; callers pass `now` so expiry is deterministic under test.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::Email;

/// Six-digit numeric passcode.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Draw a code uniformly from `100000..=999999`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(100_000..=999_999_u32).to_string())
    }

    /// Wrap caller-supplied text for comparison.
    pub fn from_input(raw: &str) -> Self {
        Self(raw.trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

/// Result of an OTP operation, rendered to clients as `{success, message}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Sent,
    SendFailed,
    Verified,
    NotFound,
    Expired,
    Incorrect,
}

impl OtpOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Sent | Self::Verified)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Sent => "OTP sent to your email",
            Self::SendFailed => "Failed to send OTP",
            Self::Verified => "OTP verified",
            Self::NotFound => "No OTP found for this email",
            Self::Expired => "OTP has expired",
            Self::Incorrect => "Incorrect OTP",
        }
    }
}

#[derive(Debug, Clone)]
struct IssuedOtp {
    code: OtpCode,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct OtpState {
    issued: HashMap<Email, IssuedOtp>,
    verified: HashSet<Email>,
}

/// Keyed passcode store shared across HTTP workers.
///
/// The lock is held only for map operations, never across an await.
#[derive(Debug, Default)]
pub struct OtpStore {
    state: Mutex<OtpState>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, OtpState> {
        // A poisoned map is still structurally valid.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `code` for `email`, replacing any earlier code.
    pub fn issue(&self, email: Email, code: OtpCode, now: DateTime<Utc>, ttl: Duration) {
        let expires_at = now + ttl;
        self.lock().issued.insert(email, IssuedOtp { code, expires_at });
    }

    /// Check `code` against the stored entry for `email`.
    ///
    /// Expired and matching entries are removed; a mismatch leaves the entry
    /// in place. A successful check marks the email as verified.
    pub fn verify(&self, email: &Email, code: &OtpCode, now: DateTime<Utc>) -> OtpOutcome {
        let mut state = self.lock();
        let Some(entry) = state.issued.get(email) else {
            return OtpOutcome::NotFound;
        };
        if now > entry.expires_at {
            state.issued.remove(email);
            return OtpOutcome::Expired;
        }
        if entry.code != *code {
            return OtpOutcome::Incorrect;
        }
        state.issued.remove(email);
        state.verified.insert(email.clone());
        OtpOutcome::Verified
    }

    pub fn is_verified(&self, email: &Email) -> bool {
        self.lock().verified.contains(email)
    }

    /// Remove the verified mark for `email`, reporting whether it was set.
    pub fn take_verified(&self, email: &Email) -> bool {
        self.lock().verified.remove(email)
    }
}
