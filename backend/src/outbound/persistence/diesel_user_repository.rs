//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordDigest, ProfileUpdate, Role, User, UserId, UserRecord,
};

use super::error_mapping::{map_diesel_error, map_pool_error, unique_violation_column};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if let Some(column) = unique_violation_column(&error) {
        return UserPersistenceError::duplicate(column);
    }
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        password_digest,
        role,
        phone,
        verified,
        created_at,
    } = row;
    let email = Email::new(&email)
        .map_err(|err| UserPersistenceError::query(format!("stored email for user {id}: {err}")))?;
    let role: Role = role
        .parse()
        .map_err(|err| UserPersistenceError::query(format!("stored role for user {id}: {err}")))?;
    Ok(User::from(UserRecord {
        id: UserId::new(id),
        name,
        email,
        password: PasswordDigest::from_stored(password_digest),
        role,
        phone,
        verified,
        created_at,
    }))
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(row_to_user).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            name: &user.name,
            email: user.email.as_ref(),
            password_digest: user.password.as_str(),
            role: user.role.as_str(),
            phone: user.phone.as_deref(),
            verified: user.verified,
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_user(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = users::table
            .filter(users::role.eq(role.as_str()))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_users(rows)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = UserProfileChangeset {
            name: update.name(),
            email: update.email().as_ref(),
            phone: update.phone(),
        };
        diesel::update(users::table.find(id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn row(role: &str, email: &str) -> UserRow {
        UserRow {
            id: 7,
            name: "Ravi".to_owned(),
            email: email.to_owned(),
            password_digest: PasswordDigest::from_plaintext("pw").as_str().to_owned(),
            role: role.to_owned(),
            phone: None,
            verified: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn stored_rows_become_users() {
        let user = row_to_user(row("mechanic", "ravi@example.com")).expect("valid row");
        assert_eq!(user.id(), UserId::new(7));
        assert_eq!(user.role(), Role::Mechanic);
        assert!(user.password().matches("pw"));
    }

    #[rstest]
    #[case("janitor", "ravi@example.com")]
    #[case("user", "not-an-email")]
    fn corrupt_rows_surface_query_errors(#[case] role: &str, #[case] email: &str) {
        let err = row_to_user(row(role, email)).expect_err("corrupt row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
