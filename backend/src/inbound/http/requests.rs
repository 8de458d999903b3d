//! Motorist-facing service request handlers.
//!
//! ```text
//! GET  /api/v1/user/dashboard
//! POST /api/v1/requests {"title":"Flat tyre","description":"NH-44","lat":28.70,"lng":77.10}
//! GET  /api/v1/requests/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RequestDetail, ServiceRequestView};
use crate::domain::{Error, RequestId, ServiceRequestDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, request_validation_error, require};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitRequest {
    #[schema(example = "Flat tyre")]
    pub title: Option<String>,
    pub description: Option<String>,
    pub vehicle: Option<String>,
    #[schema(example = "tyre")]
    pub service_type: Option<String>,
    #[schema(example = 28.70)]
    pub lat: Option<f64>,
    #[schema(example = 77.10)]
    pub lng: Option<f64>,
}

impl TryFrom<SubmitRequest> for ServiceRequestDraft {
    type Error = Error;

    fn try_from(value: SubmitRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, FieldName::new("title"))?;
        let lat = require(value.lat, FieldName::new("lat"))?;
        let lng = require(value.lng, FieldName::new("lng"))?;
        ServiceRequestDraft::try_new(
            &title,
            value.description.as_deref().unwrap_or_default(),
            value.vehicle,
            value.service_type,
            lat,
            lng,
        )
        .map_err(request_validation_error)
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/user/dashboard",
    responses(
        (status = 200, description = "The caller's requests, newest first", body = [ServiceRequestView]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a user account", body = Error)
    ),
    tags = ["requests"],
    operation_id = "userDashboard"
)]
#[get("/user/dashboard")]
pub async fn user_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ServiceRequestView>>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    Ok(web::Json(state.requests.user_dashboard(actor).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Request submitted", body = ServiceRequestView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a user account", body = Error)
    ),
    tags = ["requests"],
    operation_id = "submitRequest"
)]
#[post("/requests")]
pub async fn submit_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let draft = ServiceRequestDraft::try_from(payload.into_inner())?;
    let view = state.requests.submit(actor, draft).await?;
    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request with requester and mechanic", body = RequestDetail),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Caller is not a participant", body = Error),
        (status = 404, description = "No such request", body = Error)
    ),
    tags = ["requests"],
    operation_id = "requestDetail"
)]
#[get("/requests/{id}")]
pub async fn request_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<web::Json<RequestDetail>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let detail = state
        .requests
        .request_detail(actor, RequestId::new(id.into_inner()))
        .await?;
    Ok(web::Json(detail))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{Coordinates, RequestStatus, Role, UserId};
    use crate::inbound::http::test_utils::{MockPorts, sign_in_cookie, test_app};

    fn view(id: i64, requester: i64) -> ServiceRequestView {
        ServiceRequestView {
            id: RequestId::new(id),
            requester: UserId::new(requester),
            title: "Flat tyre".to_owned(),
            description: String::new(),
            vehicle: None,
            service_type: None,
            location: Coordinates::try_new(28.70, 77.10).expect("coordinates"),
            status: RequestStatus::Submitted,
            assigned_mechanic: None,
            mechanic_response: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn submit_builds_a_draft_for_the_caller() {
        let mut ports = MockPorts::default().signed_in_as(Role::User);
        ports
            .requests
            .expect_submit()
            .withf(|actor, draft| {
                actor.id == UserId::new(4)
                    && draft.title() == "Flat tyre"
                    && draft.location().lat() == 28.70
            })
            .times(1)
            .return_once(|_, _| Ok(view(1, 4)));
        let app = test_app!(ports.into_state(), submit_request);
        let cookie = sign_in_cookie!(app, 4);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/requests")
                .cookie(cookie)
                .set_json(json!({"title": " Flat tyre ", "lat": 28.70, "lng": 77.10}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "submitted");
        assert!(body["assignedMechanic"].is_null());
    }

    #[rstest]
    #[case(json!({"lat": 28.7, "lng": 77.1}), "title")]
    #[case(json!({"title": "Battery", "lng": 77.1}), "lat")]
    #[case(json!({"title": "  ", "lat": 28.7, "lng": 77.1}), "title")]
    #[actix_web::test]
    async fn submit_rejects_incomplete_drafts(#[case] body: Value, #[case] field: &str) {
        let app = test_app!(
            MockPorts::default().signed_in_as(Role::User).into_state(),
            submit_request
        );
        let cookie = sign_in_cookie!(app, 4);
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/requests")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn dashboard_forwards_role_errors() {
        let mut ports = MockPorts::default().signed_in_as(Role::Mechanic);
        ports
            .requests
            .expect_user_dashboard()
            .return_once(|_| Err(Error::forbidden("user role required")));
        let app = test_app!(ports.into_state(), user_dashboard);
        let cookie = sign_in_cookie!(app, 9);
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/user/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn detail_uses_the_path_id() {
        let mut ports = MockPorts::default().signed_in_as(Role::Admin);
        ports
            .requests
            .expect_request_detail()
            .withf(|_, id| *id == RequestId::new(12))
            .return_once(|_, _| Err(Error::not_found("service request 12 not found")));
        let app = test_app!(ports.into_state(), request_detail);
        let cookie = sign_in_cookie!(app, 1);
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/requests/12")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
