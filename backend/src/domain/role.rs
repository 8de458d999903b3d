//! Account roles.
//!
//! Every authorisation decision matches on [`Role`] exhaustively; there is no
//! string comparison outside parsing and persistence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role fixed for an account at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Motorist who submits service requests.
    User,
    /// Mechanic (called "worker" in older clients) who services requests.
    Mechanic,
    /// Operator who assigns mechanics.
    Admin,
}

/// Error returned when a role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'; expected user, mechanic or admin")]
pub struct RoleParseError(pub String);

impl Role {
    /// Lower-case name used in storage and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Mechanic => "mechanic",
            Self::Admin => "admin",
        }
    }

    /// Landing page a client should open after login.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Self::User => "/user/dashboard",
            Self::Mechanic => "/mechanic/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "mechanic" | "worker" => Ok(Self::Mechanic),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}
