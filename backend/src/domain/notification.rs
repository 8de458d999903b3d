//! In-app notifications.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{RequestId, RequestStatus, Role, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NotificationId(i64);

impl NotificationId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Notification awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub target_role: Option<Role>,
    pub target_user: Option<UserId>,
    pub message: String,
}

impl NewNotification {
    /// Direct message to one account.
    pub fn for_user(user: UserId, role: Role, message: impl Into<String>) -> Self {
        Self {
            target_role: Some(role),
            target_user: Some(user),
            message: message.into(),
        }
    }

    /// Broadcast to every account holding `role`.
    pub fn for_role(role: Role, message: impl Into<String>) -> Self {
        Self {
            target_role: Some(role),
            target_user: None,
            message: message.into(),
        }
    }
}

/// Persisted notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user: Option<UserId>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// Whether the notification is addressed to `user` directly or through
    /// a broadcast to their role.
    pub fn is_visible_to(&self, user: UserId, role: Role) -> bool {
        match self.target_user {
            Some(target) => target == user,
            None => self.target_role == Some(role),
        }
    }
}

pub fn new_request_message(request: RequestId, title: &str) -> String {
    format!("New service request #{request}: {title}")
}

pub fn assignment_message(request: RequestId, title: &str) -> String {
    format!("You have been assigned request #{request}: {title}")
}

pub fn rejection_message(request: RequestId) -> String {
    format!("Request #{request} was rejected and needs reassignment")
}

pub fn status_message(request: RequestId, status: RequestStatus) -> String {
    format!("Your request #{request} is now {status}")
}
