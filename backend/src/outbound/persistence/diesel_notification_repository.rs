//! PostgreSQL-backed [`NotificationRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{NewNotification, Notification, NotificationId, Role, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let target_role = row
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|err| {
            NotificationRepositoryError::query(format!("stored notification {}: {err}", row.id))
        })?;
    Ok(Notification {
        id: NotificationId::new(row.id),
        target_role,
        target_user: row.user_id.map(UserId::new),
        message: row.message,
        created_at: row.created_at,
        read: row.is_read,
    })
}

/// Rows addressed to `user` directly, or untargeted broadcasts to `role`.
macro_rules! visible_to {
    ($user:expr, $role:expr) => {
        notifications::user_id.eq($user.get()).or(notifications::user_id
            .is_null()
            .and(notifications::role.eq($role.as_str())))
    };
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewNotificationRow {
            role: notification.target_role.map(Role::as_str),
            user_id: notification.target_user.map(UserId::get),
            message: &notification.message,
        };
        let stored: NotificationRow = diesel::insert_into(notifications::table)
            .values(&row)
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_notification(stored)
    }

    async fn list_visible_to(
        &self,
        user: UserId,
        role: Role,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(visible_to!(user, role))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_notification).collect()
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user: UserId,
        role: Role,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.get()))
                .filter(visible_to!(user, role)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("mechanic"), Some(Role::Mechanic))]
    #[case(None, None)]
    fn rows_keep_their_target_role(#[case] stored: Option<&str>, #[case] role: Option<Role>) {
        let notification = row_to_notification(NotificationRow {
            id: 1,
            role: stored.map(str::to_owned),
            user_id: Some(4),
            message: "hello".to_owned(),
            created_at: Utc::now(),
            is_read: false,
        })
        .expect("valid row");
        assert_eq!(notification.target_role, role);
        assert_eq!(notification.target_user, Some(UserId::new(4)));
    }
}
