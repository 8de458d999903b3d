//! Port for workshop and review persistence.

use async_trait::async_trait;

use crate::domain::{NewWorkshopReview, Workshop, WorkshopId, WorkshopReview};

use super::define_port_error;

define_port_error! {
    /// Errors raised by workshop repository adapters.
    pub enum WorkshopRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "workshop repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "workshop repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkshopRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Workshop>, WorkshopRepositoryError>;

    async fn find_by_id(&self, id: WorkshopId)
    -> Result<Option<Workshop>, WorkshopRepositoryError>;

    /// Reviews of `workshop`, newest first.
    async fn list_reviews(
        &self,
        workshop: WorkshopId,
    ) -> Result<Vec<WorkshopReview>, WorkshopRepositoryError>;

    async fn insert_review(
        &self,
        review: &NewWorkshopReview,
    ) -> Result<WorkshopReview, WorkshopRepositoryError>;

    async fn set_rating(&self, id: WorkshopId, rating: f64)
    -> Result<(), WorkshopRepositoryError>;
}
