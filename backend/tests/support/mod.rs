//! Shared harness for HTTP flow tests.
//!
//! Wires the real domain services over [`InMemoryStore`] and serves them
//! behind a cookie session, so each test drives the API exactly as a client
//! would without a database.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use roadguard::Trace;
use roadguard::domain::{
    AccountService, AdminSeed, Coordinates, Email, MechanicLocatorService, NotificationService,
    OtpService, OtpStore, RequestWorkflowService, WorkshopId, WorkshopService,
};
use roadguard::inbound::http::configure_api;
use roadguard::inbound::http::mechanics_feed::mechanic_feed;
use roadguard::inbound::http::state::HttpState;
use roadguard::test_support::{InMemoryStore, MutableClock, RecordingMailer};

pub const ADMIN_EMAIL: &str = "admin@roadguard.local";
pub const ADMIN_PASSWORD: &str = "admin";
pub const PASSWORD: &str = "hunter22";

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<MutableClock>,
    pub state: web::Data<HttpState>,
    pub workshop: WorkshopId,
}

impl World {
    /// Fresh services with the administrator seeded and one workshop.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single().expect("timestamp"),
        ));
        let otp = Arc::new(OtpService::new(
            Arc::new(OtpStore::new()),
            mailer.clone(),
            clock.clone(),
        ));
        let accounts = Arc::new(AccountService::new(store.clone(), otp.clone()));
        accounts
            .seed_admin(&AdminSeed {
                name: "Administrator".to_owned(),
                email: Email::new(ADMIN_EMAIL).expect("admin email"),
                password: ADMIN_PASSWORD.to_owned(),
            })
            .await
            .expect("seed admin");
        let workshop = store.add_workshop(
            "Ring Road Motors",
            Coordinates::try_new(28.71, 77.11).expect("coordinates"),
        );

        let state = web::Data::new(HttpState {
            accounts,
            requests: Arc::new(RequestWorkflowService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            workshops: Arc::new(WorkshopService::new(store.clone(), store.clone())),
            notifications: Arc::new(NotificationService::new(store.clone())),
            otp,
            mechanics: Arc::new(MechanicLocatorService::new(store.clone())),
        });
        Self {
            store,
            mailer,
            clock,
            state,
            workshop,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".into())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api))
            .service(web::scope("/api").service(mechanic_feed))
    }
}

/// Status, JSON body (or `Null`) and any session cookie the server set.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub raw: String,
    pub cookie: Option<Cookie<'static>>,
}

pub async fn send<S, B>(app: &S, request: test::TestRequest) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(res).await;
    let raw = String::from_utf8_lossy(&bytes).into_owned();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        body,
        raw,
        cookie,
    }
}

pub fn get(uri: &str, cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

pub fn post(uri: &str, cookie: &Cookie<'static>, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

/// Verify `email` by passcode and register it with `role`.
pub async fn register<S, B>(app: &S, world: &World, name: &str, email: &str, role: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    verify_email(app, world, email).await;
    let created = send(
        app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "role": role,
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.raw);
    created.body
}

/// Request a passcode for `email` and submit it.
pub async fn verify_email<S, B>(app: &S, world: &World, email: &str)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let sent = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/otp/send")
            .set_json(json!({"email": email})),
    )
    .await;
    assert_eq!(sent.status, StatusCode::OK, "{}", sent.raw);

    let code = world.mailer.last_code_for(email).expect("code recorded");
    let verified = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/otp/verify")
            .set_json(json!({"email": email, "otp": code})),
    )
    .await;
    assert_eq!(verified.status, StatusCode::OK, "{}", verified.raw);
}

/// Log in and return the session cookie.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.raw);
    reply.cookie.expect("session cookie")
}
