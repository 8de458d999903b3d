//! In-app notification handlers.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications for the caller or their role, newest first", body = [Notification]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    Ok(web::Json(state.notifications.list(actor).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    state
        .notifications
        .mark_read(actor, NotificationId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{Role, UserId};
    use crate::inbound::http::test_utils::{MockPorts, sign_in_cookie, test_app};

    #[rstest]
    #[actix_web::test]
    async fn list_returns_the_inbox_for_the_caller() {
        let mut ports = MockPorts::default().signed_in_as(Role::Admin);
        ports
            .notifications
            .expect_list()
            .withf(|actor| actor.role == Role::Admin)
            .return_once(|_| {
                Ok(vec![Notification {
                    id: NotificationId::new(1),
                    target_role: Some(Role::Admin),
                    target_user: None,
                    message: "New service request #1: Flat tyre".to_owned(),
                    created_at: Utc::now(),
                    read: false,
                }])
            });
        let app = test_app!(ports.into_state(), list_notifications);
        let cookie = sign_in_cookie!(app, 1);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/notifications")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<Notification> = test::read_body_json(res).await;
        assert_eq!(body.len(), 1);
        assert!(!body[0].read);
    }

    #[rstest]
    #[case(Ok(()), StatusCode::NO_CONTENT)]
    #[case(Err(Error::not_found("notification 5 not found")), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn mark_read_maps_outcomes(
        #[case] outcome: Result<(), Error>,
        #[case] status: StatusCode,
    ) {
        let mut ports = MockPorts::default().signed_in_as(Role::User);
        ports
            .notifications
            .expect_mark_read()
            .withf(|actor, id| actor.id == UserId::new(2) && *id == NotificationId::new(5))
            .return_once(move |_, _| outcome);
        let app = test_app!(ports.into_state(), mark_read);
        let cookie = sign_in_cookie!(app, 2);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/notifications/5/read")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), status);
    }
}
