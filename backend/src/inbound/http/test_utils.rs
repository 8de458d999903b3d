//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::{
    MockAccounts, MockMechanicDirectory, MockNotificationInbox, MockOtpVerification,
    MockRequestWorkflow, MockWorkshopReviews,
};
use crate::domain::{Error, Role, UserId, UserSummary};

/// Cookie session middleware with a throwaway key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Mocks for every driving port; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccounts,
    pub requests: MockRequestWorkflow,
    pub workshops: MockWorkshopReviews,
    pub notifications: MockNotificationInbox,
    pub otp: MockOtpVerification,
    pub mechanics: MockMechanicDirectory,
}

impl MockPorts {
    /// Let `current_user` resolve every session to an account with `role`.
    pub fn signed_in_as(mut self, role: Role) -> Self {
        self.accounts
            .expect_current_user()
            .returning(move |id| Ok(summary(id.get(), role)));
        self
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            requests: Arc::new(self.requests),
            workshops: Arc::new(self.workshops),
            notifications: Arc::new(self.notifications),
            otp: Arc::new(self.otp),
            mechanics: Arc::new(self.mechanics),
        })
    }
}

pub fn summary(id: i64, role: Role) -> UserSummary {
    UserSummary {
        id: UserId::new(id),
        name: format!("{role} {id}"),
        email: format!("{role}{id}@example.com"),
        role,
        phone: None,
    }
}

/// Route target that signs the caller in as `{id}` without credentials.
pub async fn sign_in(session: SessionContext, id: web::Path<i64>) -> Result<HttpResponse, Error> {
    session.persist_user(UserId::new(id.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Initialise an app serving `services` under `/api/v1` with `state`,
/// plus the [`sign_in`] helper route.
macro_rules! test_app {
    ($state:expr, $($service:expr),+ $(,)?) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::inbound::http::test_utils::test_session_middleware())
                .app_data($state)
                .route(
                    "/test/sign-in/{id}",
                    actix_web::web::post().to($crate::inbound::http::test_utils::sign_in),
                )
                .service(actix_web::web::scope("/api/v1")$(.service($service))+),
        )
        .await
    };
}
pub(crate) use test_app;

/// Session cookie for user `$id` on an app built with [`test_app!`].
macro_rules! sign_in_cookie {
    ($app:expr, $id:expr) => {{
        let res = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri(&format!("/test/sign-in/{}", $id))
                .to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&res)
    }};
}
pub(crate) use sign_in_cookie;
