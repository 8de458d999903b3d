//! Cookie session access for handlers.
//!
//! Only the user id is stored in the cookie. The caller's role is reloaded
//! from the account store on every request so a role change or deleted
//! account takes effect immediately.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::Accounts;
use crate::domain::{Actor, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `user_id` as the authenticated caller.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The stored user id. Unreadable values count as an anonymous session.
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(id) => id.map(UserId::new),
            Err(error) => {
                warn!(%error, "discarding unreadable session user id");
                None
            }
        }
    }

    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the caller's current account into an [`Actor`].
    pub async fn require_actor(&self, accounts: &dyn Accounts) -> Result<Actor, Error> {
        let id = self.require_user_id()?;
        let user = accounts.current_user(id).await?;
        Ok(Actor::new(user.id, user.role))
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockAccounts;
    use crate::domain::{Role, UserSummary};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    fn summary(id: i64, role: Role) -> UserSummary {
        UserSummary {
            id: UserId::new(id),
            name: "Ravi".to_owned(),
            email: "ravi@example.com".to_owned(),
            role,
            phone: None,
        }
    }

    async fn set_user(session: SessionContext) -> Result<HttpResponse, Error> {
        session.persist_user(UserId::new(42))?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    async fn logout(session: SessionContext) -> HttpResponse {
        session.purge();
        HttpResponse::NoContent().finish()
    }

    async fn tamper(session: Session) -> HttpResponse {
        match session.insert(USER_ID_KEY, "not-a-number") {
            Ok(()) => HttpResponse::Ok().finish(),
            Err(_) => HttpResponse::InternalServerError().finish(),
        }
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .route("/set", web::post().to(set_user))
                    .route("/me", web::get().to(whoami))
                    .route("/logout", web::post().to(logout))
                    .route("/tamper", web::post().to(tamper)),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn persisted_user_id_round_trips() {
        let app = session_app!();
        let set = test::call_service(&app, test::TestRequest::post().uri("/set").to_request()).await;
        let cookie = session_cookie(&set);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "42");
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_callers_are_unauthorised() {
        let app = session_app!();
        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn tampered_values_count_as_anonymous() {
        let app = session_app!();
        let set =
            test::call_service(&app, test::TestRequest::post().uri("/tamper").to_request()).await;
        let cookie = session_cookie(&set);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = session_app!();
        let set = test::call_service(&app, test::TestRequest::post().uri("/set").to_request()).await;
        let cookie = session_cookie(&set);
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = session_cookie(&res);
        assert_eq!(removal.value(), "");
    }

    #[rstest]
    #[actix_web::test]
    async fn actor_role_comes_from_the_account_store() {
        let mut accounts = MockAccounts::new();
        accounts
            .expect_current_user()
            .withf(|id| *id == UserId::new(42))
            .times(1)
            .return_once(|_| Ok(summary(42, Role::Mechanic)));

        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(accounts))
                .route("/set", web::post().to(set_user))
                .route(
                    "/actor",
                    web::get().to(
                        |session: SessionContext, accounts: web::Data<MockAccounts>| async move {
                            let actor = session.require_actor(accounts.get_ref()).await?;
                            Ok::<_, Error>(HttpResponse::Ok().body(actor.role.as_str()))
                        },
                    ),
                ),
        )
        .await;
        let set = test::call_service(&app, test::TestRequest::post().uri("/set").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/actor")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "mechanic");
    }
}
