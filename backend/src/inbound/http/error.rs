//! Rendering of domain [`Error`]s as HTTP responses.
//!
//! The body is the serialised error itself (`code`, `message`, optional
//! `traceId` and `details`). Internal failures are logged in full and
//! replaced with a generic message before they leave the process.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The error as clients may see it.
fn public_view(error: &Error) -> Error {
    if status_for(error.code()) != StatusCode::INTERNAL_SERVER_ERROR {
        return error.clone();
    }
    let redacted = Error::internal(REDACTED);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.code(), message = self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(public_view(self))
    }
}

impl From<actix_web::Error> for Error {
    /// Extractor rejections (bad JSON, unparsable path segments) stay client
    /// errors; anything else is treated as internal.
    fn from(err: actix_web::Error) -> Self {
        let status = err.as_response_error().status_code();
        if status.is_client_error() {
            warn!(error = %err, %status, "request rejected by extractor");
            Error::invalid_request(err.to_string())
        } else {
            error!(error = %err, "actix error promoted to domain error");
            Error::internal(REDACTED)
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    const TRACE: &str = "00000000-0000-0000-0000-000000000000";

    async fn body_of(error: &Error) -> Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("admins only"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("Email already registered"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_statuses(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(error.status_code(), status);
    }

    #[rstest]
    #[actix_web::test]
    async fn internal_details_are_redacted() {
        let error = Error::internal("connection string leaked")
            .with_trace_id(TRACE)
            .with_details(json!({"secret": "x"}));
        let body = body_of(&error).await;
        assert_eq!(body["message"], REDACTED);
        assert_eq!(body["traceId"], TRACE);
        assert!(body.get("details").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn client_errors_keep_message_and_details() {
        let error = Error::invalid_request("title must not be empty")
            .with_details(json!({"field": "title", "code": "empty_title"}));
        let body = body_of(&error).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["message"], "title must not be empty");
        assert_eq!(body["details"]["field"], "title");
    }

    #[rstest]
    fn trace_header_is_set_when_known() {
        let response = Error::forbidden("nope").with_trace_id(TRACE).error_response();
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some(TRACE)
        );
    }

    #[rstest]
    #[case(actix_web::error::ErrorBadRequest("bad json"), ErrorCode::InvalidRequest)]
    #[case(actix_web::error::ErrorInternalServerError("pool"), ErrorCode::InternalError)]
    fn actix_errors_keep_their_side(#[case] source: actix_web::Error, #[case] code: ErrorCode) {
        assert_eq!(Error::from(source).code(), code);
    }
}
