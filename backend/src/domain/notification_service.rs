//! Notification inbox service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{NotificationInbox, NotificationRepository, NotificationRepositoryError};
use crate::domain::{Actor, Error, Notification, NotificationId};

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationInbox for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, actor: Actor) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_visible_to(actor.id, actor.role)
            .await
            .map_err(map_repository_error)
    }

    async fn mark_read(&self, actor: Actor, id: NotificationId) -> Result<(), Error> {
        let matched = self
            .notifications
            .mark_read(id, actor.id, actor.role)
            .await
            .map_err(map_repository_error)?;
        if matched {
            Ok(())
        } else {
            Err(Error::not_found(format!("notification {id} not found")))
        }
    }
}
