//! Driving port for reading in-app notifications.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Notification, NotificationId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// Notifications addressed to the caller or their role, newest first.
    async fn list(&self, actor: Actor) -> Result<Vec<Notification>, Error>;

    async fn mark_read(&self, actor: Actor, notification: NotificationId) -> Result<(), Error>;
}
