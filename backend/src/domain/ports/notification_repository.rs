//! Port for notification persistence.

use async_trait::async_trait;

use crate::domain::{NewNotification, Notification, NotificationId, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// Rows targeted at `user`, plus broadcasts to `role`, newest first.
    async fn list_visible_to(
        &self,
        user: UserId,
        role: Role,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Set the read flag if the row is visible to `user`; returns whether a
    /// row matched.
    async fn mark_read(
        &self,
        id: NotificationId,
        user: UserId,
        role: Role,
    ) -> Result<bool, NotificationRepositoryError>;
}
