//! Cookie session settings read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | `/var/run/secrets/session_key` | Key material, at least 64 bytes in release builds |
//! | `SESSION_COOKIE_SECURE` | `1` | Mark the cookie `Secure` |
//! | `SESSION_ALLOW_EPHEMERAL` | `0` | Fall back to a random key when the file is unreadable |
//!
//! Debug builds always allow the ephemeral fallback so a fresh checkout runs
//! without secrets; sessions then do not survive a restart.

use std::path::PathBuf;

use actix_web::cookie::Key;
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
/// `Key::derive_from` needs at least this much input.
const KEY_MIN_LEN: usize = 32;
const RELEASE_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    match env.string(name) {
        None => Ok(default),
        Some(value) => parse_bool(&value).ok_or(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn read_key(path: PathBuf, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let mut bytes = std::fs::read(&path).map_err(|source| SessionConfigError::KeyRead {
        path: path.clone(),
        source,
    })?;
    let min_len = match mode {
        BuildMode::Debug => KEY_MIN_LEN,
        BuildMode::Release => RELEASE_KEY_MIN_LEN,
    };
    let length = bytes.len();
    let key = (length >= min_len).then(|| Key::derive_from(&bytes));
    bytes.zeroize();
    key.ok_or(SessionConfigError::KeyTooShort {
        path,
        length,
        min_len,
    })
}

/// Resolve session settings for `mode`.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_from_env(env, COOKIE_SECURE_ENV, true)?;
    let allow_ephemeral =
        mode == BuildMode::Debug || bool_from_env(env, ALLOW_EPHEMERAL_ENV, false)?;
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_DEFAULT_PATH.to_owned()),
    );

    let key = match read_key(path, mode) {
        Ok(key) => key,
        Err(error @ SessionConfigError::KeyRead { .. }) if allow_ephemeral => {
            warn!(%error, "using temporary session key; sessions end on restart");
            Key::generate()
        }
        Err(error) => return Err(error),
    };
    info!(fingerprint = %key_fingerprint(&key), cookie_secure, "session key loaded");
    Ok(SessionSettings { key, cookie_secure })
}

/// Short hex digest of the signing key, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
