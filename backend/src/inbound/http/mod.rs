//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers translate JSON bodies and the cookie session into calls on the
//! driving ports held by [`state::HttpState`].

pub mod accounts;
pub mod admin;
pub mod error;
pub mod health;
pub mod mechanic;
pub mod mechanics_feed;
pub mod notifications;
pub mod otp;
pub mod requests;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod workshops;

use actix_web::web;

pub use error::ApiResult;

/// Register every session-backed handler; mount under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(accounts::update_profile)
        .service(otp::send_otp)
        .service(otp::verify_otp)
        .service(requests::user_dashboard)
        .service(requests::submit_request)
        .service(requests::request_detail)
        .service(mechanic::mechanic_dashboard)
        .service(mechanic::respond)
        .service(admin::admin_dashboard)
        .service(admin::assign)
        .service(admin::export_requests)
        .service(workshops::list_workshops)
        .service(workshops::workshop_detail)
        .service(workshops::review_workshop)
        .service(notifications::list_notifications)
        .service(notifications::mark_read);
}
