//! Admin handlers: overview, assignment and spreadsheet export.
//!
//! ```text
//! GET  /api/v1/admin/dashboard
//! POST /api/v1/admin/assign {"requestId":12,"mechanicId":3}
//! GET  /api/v1/admin/export.csv
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use csv::Writer;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AdminDashboard, RequestExportRow, ServiceRequestView};
use crate::domain::{Error, RequestId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const EXPORT_HEADER: [&str; 6] = ["ID", "Title", "Status", "User", "Mechanic", "Created At"];
const EXPORT_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
const EXPORT_FILENAME: &str = "requests.csv";

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignRequest {
    pub request_id: Option<i64>,
    pub mechanic_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Unassigned and recent requests with accounts", body = AdminDashboard),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admins only", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AdminDashboard>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    Ok(web::Json(state.requests.admin_dashboard(actor).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/assign",
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Mechanic assigned", body = ServiceRequestView),
        (status = 400, description = "Invalid request or target is not a mechanic", body = Error),
        (status = 403, description = "Admins only", body = Error),
        (status = 404, description = "Unknown request or mechanic", body = Error)
    ),
    tags = ["admin"],
    operation_id = "assignMechanic"
)]
#[post("/admin/assign")]
pub async fn assign(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AssignRequest>,
) -> ApiResult<web::Json<ServiceRequestView>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let AssignRequest {
        request_id,
        mechanic_id,
    } = payload.into_inner();
    let request = RequestId::new(require(request_id, FieldName::new("requestId"))?);
    let mechanic = UserId::new(require(mechanic_id, FieldName::new("mechanicId"))?);
    Ok(web::Json(state.requests.assign(actor, request, mechanic).await?))
}

fn csv_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to write CSV export: {error}"))
}

/// Render export rows with the fixed header.
pub(crate) fn render_csv(rows: &[RequestExportRow]) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record([
                row.id.to_string(),
                row.title.clone(),
                row.status.to_string(),
                row.user.clone(),
                row.mechanic.clone(),
                row.created_at.format(EXPORT_TIMESTAMP).to_string(),
            ])
            .map_err(csv_error)?;
    }
    writer.into_inner().map_err(csv_error)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/export.csv",
    responses(
        (status = 200, description = "Every request as CSV", content_type = "text/csv", body = String),
        (status = 403, description = "Admins only", body = Error)
    ),
    tags = ["admin"],
    operation_id = "exportRequests"
)]
#[get("/admin/export.csv")]
pub async fn export_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let rows = state.requests.export_requests(actor).await?;
    let body = render_csv(&rows)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(EXPORT_FILENAME.to_owned())],
            },
        ))
        .body(body))
}
