//! Mechanic handlers.
//!
//! ```text
//! GET  /api/v1/mechanic/dashboard
//! POST /api/v1/mechanic/respond/{id} {"action":"accept","comment":"On my way"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ServiceRequestView;
use crate::domain::{Error, RequestAction, RequestId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, request_validation_error, require};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RespondRequest {
    /// One of `accept`, `reject`, `start`, `complete`.
    #[schema(example = "accept")]
    pub action: Option<String>,
    pub comment: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/mechanic/dashboard",
    responses(
        (status = 200, description = "Requests assigned to the caller", body = [ServiceRequestView]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Mechanics only", body = Error)
    ),
    tags = ["mechanic"],
    operation_id = "mechanicDashboard"
)]
#[get("/mechanic/dashboard")]
pub async fn mechanic_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ServiceRequestView>>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    Ok(web::Json(state.requests.mechanic_dashboard(actor).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/mechanic/respond/{id}",
    params(("id" = i64, Path, description = "Request id")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Response applied", body = ServiceRequestView),
        (status = 400, description = "Unknown action", body = Error),
        (status = 403, description = "Caller is not the assigned mechanic", body = Error),
        (status = 404, description = "No such request", body = Error)
    ),
    tags = ["mechanic"],
    operation_id = "respondToRequest"
)]
#[post("/mechanic/respond/{id}")]
pub async fn respond(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<web::Json<ServiceRequestView>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let RespondRequest { action, comment } = payload.into_inner();
    let action: RequestAction = require(action, FieldName::new("action"))?
        .parse()
        .map_err(request_validation_error)?;
    let view = state
        .requests
        .respond(actor, RequestId::new(id.into_inner()), action, comment)
        .await?;
    Ok(web::Json(view))
}
