//! PostgreSQL-backed [`WorkshopRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{WorkshopRepository, WorkshopRepositoryError};
use crate::domain::{
    Coordinates, NewWorkshopReview, Rating, UserId, Workshop, WorkshopId, WorkshopReview,
    WorkshopStatus,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewWorkshopReviewRow, WorkshopReviewRow, WorkshopRow};
use super::pool::{DbPool, PoolError};
use super::schema::{workshop_reviews, workshops};

#[derive(Clone)]
pub struct DieselWorkshopRepository {
    pool: DbPool,
}

impl DieselWorkshopRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> WorkshopRepositoryError {
    map_pool_error(error, WorkshopRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> WorkshopRepositoryError {
    map_diesel_error(
        error,
        WorkshopRepositoryError::query,
        WorkshopRepositoryError::connection,
    )
}

fn row_to_workshop(row: WorkshopRow) -> Result<Workshop, WorkshopRepositoryError> {
    let corrupt = |err: String| {
        WorkshopRepositoryError::query(format!("stored workshop {}: {err}", row.id))
    };
    let status: WorkshopStatus = row.status.parse().map_err(|err| corrupt(format!("{err}")))?;
    let location = Coordinates::try_new(row.lat, row.lng).map_err(|err| corrupt(err.to_string()))?;
    Ok(Workshop {
        id: WorkshopId::new(row.id),
        owner: row.owner_id.map(UserId::new),
        name: row.name,
        description: row.description,
        location,
        status,
        rating: row.rating,
    })
}

fn row_to_review(row: WorkshopReviewRow) -> Result<WorkshopReview, WorkshopRepositoryError> {
    let rating = Rating::try_new(i64::from(row.rating)).map_err(|err| {
        WorkshopRepositoryError::query(format!("stored review {}: {err}", row.id))
    })?;
    Ok(WorkshopReview {
        id: row.id,
        user: UserId::new(row.user_id),
        workshop: WorkshopId::new(row.workshop_id),
        rating,
        comment: row.comment,
        created_at: row.created_at,
    })
}

#[async_trait]
impl WorkshopRepository for DieselWorkshopRepository {
    async fn list(&self) -> Result<Vec<Workshop>, WorkshopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<WorkshopRow> = workshops::table
            .order(workshops::id.asc())
            .select(WorkshopRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_workshop).collect()
    }

    async fn find_by_id(&self, id: WorkshopId) -> Result<Option<Workshop>, WorkshopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        workshops::table
            .find(id.get())
            .select(WorkshopRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_workshop)
            .transpose()
    }

    async fn list_reviews(
        &self,
        workshop: WorkshopId,
    ) -> Result<Vec<WorkshopReview>, WorkshopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<WorkshopReviewRow> = workshop_reviews::table
            .filter(workshop_reviews::workshop_id.eq(workshop.get()))
            .order((workshop_reviews::created_at.desc(), workshop_reviews::id.desc()))
            .select(WorkshopReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_review).collect()
    }

    async fn insert_review(
        &self,
        review: &NewWorkshopReview,
    ) -> Result<WorkshopReview, WorkshopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewWorkshopReviewRow {
            user_id: review.user.get(),
            workshop_id: review.workshop.get(),
            rating: i16::from(review.rating.get()),
            comment: review.comment.as_deref(),
        };
        let stored: WorkshopReviewRow = diesel::insert_into(workshop_reviews::table)
            .values(&row)
            .returning(WorkshopReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_review(stored)
    }

    async fn set_rating(&self, id: WorkshopId, rating: f64) -> Result<(), WorkshopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(workshops::table.find(id.get()))
            .set(workshops::rating.eq(rating))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}
