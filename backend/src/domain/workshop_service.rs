//! Workshop browsing and reviews.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    ServiceRequestRepository, WorkshopRepository, WorkshopRepositoryError, WorkshopReviews,
};
use crate::domain::request_workflow_service::map_request_error;
use crate::domain::user::non_blank;
use crate::domain::{
    Actor, Error, NewWorkshopReview, Rating, Workshop, WorkshopDetail, WorkshopId, mean_rating,
};

fn map_workshop_error(error: WorkshopRepositoryError) -> Error {
    match error {
        WorkshopRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("workshop repository unavailable: {message}"))
        }
        WorkshopRepositoryError::Query { message } => {
            Error::internal(format!("workshop repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct WorkshopService<W, R> {
    workshops: Arc<W>,
    requests: Arc<R>,
}

impl<W, R> WorkshopService<W, R> {
    pub fn new(workshops: Arc<W>, requests: Arc<R>) -> Self {
        Self {
            workshops,
            requests,
        }
    }
}

impl<W, R> WorkshopService<W, R>
where
    W: WorkshopRepository,
{
    async fn load(&self, id: WorkshopId) -> Result<Workshop, Error> {
        self.workshops
            .find_by_id(id)
            .await
            .map_err(map_workshop_error)?
            .ok_or_else(|| Error::not_found(format!("workshop {id} not found")))
    }
}

#[async_trait]
impl<W, R> WorkshopReviews for WorkshopService<W, R>
where
    W: WorkshopRepository,
    R: ServiceRequestRepository,
{
    async fn list_workshops(&self) -> Result<Vec<Workshop>, Error> {
        self.workshops.list().await.map_err(map_workshop_error)
    }

    async fn workshop_detail(&self, id: WorkshopId) -> Result<WorkshopDetail, Error> {
        let workshop = self.load(id).await?;
        let reviews = self
            .workshops
            .list_reviews(id)
            .await
            .map_err(map_workshop_error)?;
        Ok(WorkshopDetail { workshop, reviews })
    }

    async fn review(
        &self,
        actor: Actor,
        id: WorkshopId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Workshop, Error> {
        let mut workshop = self.load(id).await?;
        // Any completed request qualifies, not only ones at this workshop.
        let eligible = self
            .requests
            .has_completed(actor.id)
            .await
            .map_err(map_request_error)?;
        if !eligible {
            return Err(Error::forbidden(
                "You can review only after completing a service!",
            ));
        }

        self.workshops
            .insert_review(&NewWorkshopReview {
                user: actor.id,
                workshop: id,
                rating,
                comment: non_blank(comment),
            })
            .await
            .map_err(map_workshop_error)?;

        let ratings: Vec<Rating> = self
            .workshops
            .list_reviews(id)
            .await
            .map_err(map_workshop_error)?
            .iter()
            .map(|review| review.rating)
            .collect();
        workshop.rating = mean_rating(&ratings);
        self.workshops
            .set_rating(id, workshop.rating)
            .await
            .map_err(map_workshop_error)?;
        info!(workshop_id = %id, rating = workshop.rating, reviews = ratings.len(), "workshop reviewed");
        Ok(workshop)
    }
}
