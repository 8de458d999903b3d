//! Application configuration loaded via OrthoConfig.
//!
//! Every field can be set from `ROADGUARD_*` environment variables, command
//! line flags, or a configuration file. Unset optional fields fall back to
//! the defaults exposed by the accessor methods.

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AdminSeed, Email, OTP_TTL_MINUTES, UserValidationError};
use crate::outbound::mail::SmtpSettings;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL: &str = "postgres://roadguard@localhost/roadguard";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_ADMIN_NAME: &str = "Administrator";
const DEFAULT_ADMIN_EMAIL: &str = "admin@roadguard.local";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid admin email: {0}")]
    AdminEmail(#[from] UserValidationError),
}

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROADGUARD")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Minutes an issued OTP stays valid.
    pub otp_ttl_minutes: Option<i64>,
    /// Allow registration without a prior OTP verification.
    #[ortho_config(default = false)]
    pub skip_email_verification: bool,
    /// SMTP relay host. OTPs are only logged when unset.
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url())
            .with_max_size(self.pool_size.unwrap_or(DEFAULT_POOL_SIZE))
    }

    pub fn admin_seed(&self) -> Result<AdminSeed, SettingsError> {
        Ok(AdminSeed {
            name: self
                .admin_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_owned()),
            email: Email::new(self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL))?,
            password: self
                .admin_password
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned()),
        })
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::minutes(self.otp_ttl_minutes.unwrap_or(OTP_TTL_MINUTES).max(1))
    }

    /// Registration is gated on OTP verification unless explicitly skipped.
    pub fn require_email_verification(&self) -> bool {
        !self.skip_email_verification
    }

    /// Relay settings, present only when host, username and password are all set.
    pub fn smtp(&self) -> Option<SmtpSettings> {
        let host = self.smtp_host.clone()?;
        let username = self.smtp_username.clone()?;
        let password = self.smtp_password.clone()?;
        Some(SmtpSettings {
            from: self.smtp_from.clone().unwrap_or_else(|| username.clone()),
            host,
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username,
            password,
        })
    }
}
