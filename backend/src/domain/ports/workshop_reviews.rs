//! Driving port for workshop browsing and reviews.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Rating, Workshop, WorkshopDetail, WorkshopId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkshopReviews: Send + Sync {
    async fn list_workshops(&self) -> Result<Vec<Workshop>, Error>;

    async fn workshop_detail(&self, workshop: WorkshopId) -> Result<WorkshopDetail, Error>;

    /// Record a review and return the workshop with its recomputed rating.
    ///
    /// Only callers with at least one completed request may review.
    async fn review(
        &self,
        actor: Actor,
        workshop: WorkshopId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Workshop, Error>;
}
