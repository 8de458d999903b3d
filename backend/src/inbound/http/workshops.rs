//! Workshop browsing and review handlers.
//!
//! ```text
//! GET  /api/v1/workshops
//! GET  /api/v1/workshops/{id}
//! POST /api/v1/workshops/{id}/reviews {"rating":5,"comment":"Quick fix"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Rating, Workshop, WorkshopDetail, WorkshopId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, rating_error, require};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewRequest {
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/workshops",
    responses(
        (status = 200, description = "Every workshop", body = [Workshop]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["workshops"],
    operation_id = "listWorkshops"
)]
#[get("/workshops")]
pub async fn list_workshops(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Workshop>>> {
    session.require_actor(state.accounts.as_ref()).await?;
    Ok(web::Json(state.workshops.list_workshops().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/workshops/{id}",
    params(("id" = i64, Path, description = "Workshop id")),
    responses(
        (status = 200, description = "Workshop with reviews, newest first", body = WorkshopDetail),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such workshop", body = Error)
    ),
    tags = ["workshops"],
    operation_id = "workshopDetail"
)]
#[get("/workshops/{id}")]
pub async fn workshop_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<web::Json<WorkshopDetail>> {
    session.require_actor(state.accounts.as_ref()).await?;
    let detail = state
        .workshops
        .workshop_detail(WorkshopId::new(id.into_inner()))
        .await?;
    Ok(web::Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/v1/workshops/{id}/reviews",
    params(("id" = i64, Path, description = "Workshop id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Workshop with its recomputed rating", body = Workshop),
        (status = 400, description = "Rating outside 1..=5", body = Error),
        (status = 403, description = "Caller has no completed request", body = Error),
        (status = 404, description = "No such workshop", body = Error)
    ),
    tags = ["workshops"],
    operation_id = "reviewWorkshop"
)]
#[post("/workshops/{id}/reviews")]
pub async fn review_workshop(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<Workshop>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let ReviewRequest { rating, comment } = payload.into_inner();
    let rating = Rating::try_new(require(rating, FieldName::new("rating"))?).map_err(rating_error)?;
    let workshop = state
        .workshops
        .review(actor, WorkshopId::new(id.into_inner()), rating, comment)
        .await?;
    Ok(web::Json(workshop))
}
