//! Account handlers.
//!
//! ```text
//! POST /api/v1/register {"name":"Asha","email":"asha@example.com","password":"pw","role":"user"}
//! POST /api/v1/login    {"email":"asha@example.com","password":"pw"}
//! POST /api/v1/logout
//! GET  /api/v1/profile
//! PUT  /api/v1/profile  {"name":"Asha V","email":"asha@example.com","phone":"555"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, ProfileUpdate, Registration, Role, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_validation_error, require, role_error, user_validation_error,
};

const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `user` (default) or `mechanic`; `worker` is accepted as an alias.
    pub role: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let name = require(value.name, NAME)?;
        let email = require(value.email, EMAIL)?;
        let password = require(value.password, PASSWORD)?;
        let role = value
            .role
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<Role>)
            .transpose()
            .map_err(role_error)?;
        Registration::try_new(&name, &email, &password, role, value.phone)
            .map_err(user_validation_error)
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login: the account and where its dashboard lives.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserSummary,
    #[schema(example = "/user/dashboard")]
    pub dashboard: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserSummary),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Email not verified or admin role requested", body = Error),
        (status = 409, description = "Email or phone already registered", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        &require(email, EMAIL)?,
        &require(password, PASSWORD)?,
    )
    .map_err(login_validation_error)?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist_user(user.id)?;
    Ok(web::Json(LoginResponse {
        dashboard: user.role.dashboard_path().to_owned(),
        user,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "The caller's account", body = UserSummary),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/profile")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserSummary>> {
    let id = session.require_user_id()?;
    Ok(web::Json(state.accounts.current_user(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserSummary),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Email or phone already registered", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserSummary>> {
    let actor = session.require_actor(state.accounts.as_ref()).await?;
    let ProfileRequest { name, email, phone } = payload.into_inner();
    let update = ProfileUpdate::try_new(&require(name, NAME)?, &require(email, EMAIL)?, phone)
        .map_err(user_validation_error)?;
    Ok(web::Json(state.accounts.update_profile(actor, update).await?))
}
