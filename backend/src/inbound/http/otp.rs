//! Email passcode handlers.
//!
//! Both endpoints answer `{success, message}` rather than the usual error
//! body so the registration form can show the message verbatim.
//!
//! ```text
//! POST /api/v1/otp/send   {"email":"asha@example.com"}
//! POST /api/v1/otp/verify {"email":"asha@example.com","otp":"123456"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Email, OtpCode, OtpOutcome};
use crate::inbound::http::state::HttpState;

const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_AND_OTP_REQUIRED: &str = "Email and OTP required";

/// Codes arrive as strings from forms and as numbers from some clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OtpInput {
    Text(String),
    Number(u64),
}

impl OtpInput {
    fn into_code(self) -> Option<OtpCode> {
        let raw = match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        };
        (!raw.trim().is_empty()).then(|| OtpCode::from_input(&raw))
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<OtpInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct OtpResponse {
    pub success: bool,
    #[schema(example = "OTP sent to your email")]
    pub message: String,
}

impl OtpResponse {
    fn failure(message: impl Into<String>) -> HttpResponse {
        HttpResponse::BadRequest().json(Self {
            success: false,
            message: message.into(),
        })
    }
}

impl From<OtpOutcome> for OtpResponse {
    fn from(outcome: OtpOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            message: outcome.message().to_owned(),
        }
    }
}

fn parse_email(raw: Option<String>, missing: &str) -> Result<Email, HttpResponse> {
    let raw = raw
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| OtpResponse::failure(missing))?;
    Email::new(&raw).map_err(|err| OtpResponse::failure(err.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/v1/otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Delivery attempted; `success` reports the outcome", body = OtpResponse),
        (status = 400, description = "Missing or malformed email", body = OtpResponse)
    ),
    tags = ["otp"],
    operation_id = "sendOtp",
    security([])
)]
#[post("/otp/send")]
pub async fn send_otp(
    state: web::Data<HttpState>,
    payload: web::Json<SendOtpRequest>,
) -> HttpResponse {
    let email = match parse_email(payload.into_inner().email, EMAIL_REQUIRED) {
        Ok(email) => email,
        Err(response) => return response,
    };
    let outcome = state.otp.issue(&email).await;
    HttpResponse::Ok().json(OtpResponse::from(outcome))
}

#[utoipa::path(
    post,
    path = "/api/v1/otp/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = OtpResponse),
        (status = 400, description = "Missing fields, or the code is absent, expired or wrong", body = OtpResponse)
    ),
    tags = ["otp"],
    operation_id = "verifyOtp",
    security([])
)]
#[post("/otp/verify")]
pub async fn verify_otp(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    let VerifyOtpRequest { email, otp } = payload.into_inner();
    let Some(code) = otp.and_then(OtpInput::into_code) else {
        return OtpResponse::failure(EMAIL_AND_OTP_REQUIRED);
    };
    let email = match parse_email(email, EMAIL_AND_OTP_REQUIRED) {
        Ok(email) => email,
        Err(response) => return response,
    };
    let outcome = state.otp.verify(&email, &code).await;
    if outcome.is_success() {
        HttpResponse::Ok().json(OtpResponse::from(outcome))
    } else {
        OtpResponse::failure(outcome.message())
    }
}
