//! OpenAPI documentation for the RoadGuard REST API.
//!
//! Schemas reachable from the registered paths are collected automatically;
//! the explicit `components` list only pins the shared error body and the
//! enums clients switch on. Swagger UI serves this document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, RequestStatus, Role, WorkshopStatus};

/// Register the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "RoadGuard API",
        description = "Roadside assistance: accounts, service requests, mechanic dispatch, workshops and notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::otp::send_otp,
        crate::inbound::http::otp::verify_otp,
        crate::inbound::http::requests::user_dashboard,
        crate::inbound::http::requests::submit_request,
        crate::inbound::http::requests::request_detail,
        crate::inbound::http::mechanic::mechanic_dashboard,
        crate::inbound::http::mechanic::respond,
        crate::inbound::http::admin::admin_dashboard,
        crate::inbound::http::admin::assign,
        crate::inbound::http::admin::export_requests,
        crate::inbound::http::workshops::list_workshops,
        crate::inbound::http::workshops::workshop_detail,
        crate::inbound::http::workshops::review_workshop,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::mechanics_feed::mechanic_feed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode, Role, RequestStatus, WorkshopStatus)),
    tags(
        (name = "accounts", description = "Registration, login and profile"),
        (name = "otp", description = "Email passcodes"),
        (name = "requests", description = "Service requests raised by users"),
        (name = "mechanic", description = "Mechanic dashboard and responses"),
        (name = "admin", description = "Dispatch and export"),
        (name = "workshops", description = "Workshops and reviews"),
        (name = "notifications", description = "In-app notifications"),
        (name = "mechanics", description = "Public mechanic map feed"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/login")]
    #[case("/api/v1/requests/{id}")]
    #[case("/api/v1/mechanic/respond/{id}")]
    #[case("/api/v1/admin/export.csv")]
    #[case("/api/v1/workshops/{id}/reviews")]
    #[case("/api/v1/notifications/{id}/read")]
    #[case("/api/mechanics")]
    #[case("/health/ready")]
    fn document_lists_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("Error").expect("Error schema") {
            RefOr::T(Schema::Object(obj)) => {
                assert!(obj.properties.contains_key("code"));
                assert!(obj.properties.contains_key("message"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
