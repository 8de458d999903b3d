//! Registration, passcode and session behaviour over the HTTP surface.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::json;

use support::{PASSWORD, World, get, login, register, send, verify_email};

fn register_body(email: &str, role: &str) -> serde_json::Value {
    json!({"name": "Asha", "email": email, "password": PASSWORD, "role": role})
}

#[rstest]
#[actix_web::test]
async fn registration_requires_a_verified_email() {
    let world = World::new().await;
    let app = test::init_service(world.app()).await;

    let refused = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("asha@example.com", "user")),
    )
    .await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(refused.body["message"], "Email not verified");

    register(&app, &world, "Asha", "asha@example.com", "user").await;

    // A verification is spent by the registration it allowed.
    let again = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("asha@example.com", "user")),
    )
    .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn verification_survives_a_failed_registration() {
    let world = World::new().await;
    let app = test::init_service(world.app()).await;
    let taken = "+91 98100 00001";

    verify_email(&app, &world, "asha@example.com").await;
    let mut asha = register_body("asha@example.com", "user");
    asha["phone"] = json!(taken);
    let first = send(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(asha),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED, "{}", first.raw);

    verify_email(&app, &world, "ravi@example.com").await;
    let mut ravi = register_body("ravi@example.com", "mechanic");
    ravi["phone"] = json!(taken);
    let clash = send(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(ravi.clone()),
    )
    .await;
    assert_eq!(clash.status, StatusCode::CONFLICT, "{}", clash.raw);
    assert_eq!(clash.body["message"], "Phone already registered");

    // No second passcode round before the retry.
    ravi["phone"] = json!("+91 98100 00002");
    let retry = send(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(ravi),
    )
    .await;
    assert_eq!(retry.status, StatusCode::CREATED, "{}", retry.raw);
}

#[rstest]
#[actix_web::test]
async fn admin_accounts_cannot_be_self_registered() {
    let world = World::new().await;
    let app = test::init_service(world.app()).await;

    let reply = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("mallory@example.com", "admin")),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case(0, StatusCode::OK, "OTP verified")]
#[case(301, StatusCode::BAD_REQUEST, "OTP has expired")]
#[actix_web::test]
async fn passcodes_expire_after_five_minutes(
    #[case] wait_seconds: i64,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let world = World::new().await;
    let app = test::init_service(world.app()).await;

    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/otp/send")
            .set_json(json!({"email": "asha@example.com"})),
    )
    .await;
    let code = world
        .mailer
        .last_code_for("asha@example.com")
        .expect("code recorded");
    world.clock.advance_seconds(wait_seconds);

    let reply = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/otp/verify")
            .set_json(json!({"email": "asha@example.com", "otp": code})),
    )
    .await;
    assert_eq!(reply.status, status);
    assert_eq!(reply.body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn login_points_each_role_at_its_dashboard() {
    let world = World::new().await;
    let app = test::init_service(world.app()).await;
    register(&app, &world, "Ravi", "ravi@example.com", "mechanic").await;

    let reply = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "RAVI@example.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["role"], "mechanic");
    assert_eq!(reply.body["dashboard"], "/mechanic/dashboard");

    let wrong = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "ravi@example.com", "password": "nope"})),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn profile_updates_and_logout_ends_the_session() {
    let world = World::new().await;
    let app = test::init_service(world.app()).await;
    register(&app, &world, "Asha", "asha@example.com", "user").await;
    let asha = login(&app, "asha@example.com", PASSWORD).await;

    let updated = send(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/profile")
            .cookie(asha.clone())
            .set_json(json!({"name": "Asha V", "email": "asha@example.com", "phone": "+91 98100 00001"})),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.raw);
    assert_eq!(updated.body["name"], "Asha V");
    assert_eq!(updated.body["phone"], "+91 98100 00001");

    let me = send(&app, get("/api/v1/profile", &asha)).await;
    assert_eq!(me.body["name"], "Asha V");

    let logout = send(
        &app,
        test::TestRequest::post().uri("/api/v1/logout").cookie(asha.clone()),
    )
    .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    let cleared = logout.cookie.expect("removal cookie");

    let after = send(&app, get("/api/v1/profile", &cleared)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}
