//! Domain primitives, aggregates and services.
//!
//! Types here know nothing about HTTP or SQL. Validation lives in
//! constructors; services implement the driving ports in [`ports`] on top of
//! the driven ones.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod geo;
pub mod mechanic_locator;
pub mod notification;
pub mod notification_service;
pub mod otp;
pub mod otp_service;
pub mod ports;
pub mod pricing;
pub mod request_workflow_service;
pub mod role;
pub mod service_request;
pub mod trace_id;
pub mod user;
pub mod workshop;
pub mod workshop_service;

pub use self::account_service::{AccountService, AdminSeed};
pub use self::auth::{Actor, LoginCredentials, LoginValidationError, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{CoordinateError, Coordinates, demo_mechanic_coordinates};
pub use self::mechanic_locator::MechanicLocatorService;
pub use self::notification::{NewNotification, Notification, NotificationId};
pub use self::notification_service::NotificationService;
pub use self::otp::{OtpCode, OtpOutcome, OtpStore};
pub use self::otp_service::{OTP_TTL_MINUTES, OtpService};
pub use self::pricing::flat_rate_fare;
pub use self::request_workflow_service::{RECENT_REQUEST_LIMIT, RequestWorkflowService};
pub use self::role::{Role, RoleParseError};
pub use self::service_request::{
    RequestAction, RequestId, RequestStatus, ServiceRequest, ServiceRequestDraft,
    ServiceRequestRecord, ServiceRequestValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, PasswordDigest, ProfileUpdate, User, UserId, UserRecord, UserSummary,
    UserValidationError,
};
pub use self::workshop::{
    NewWorkshopReview, Rating, Workshop, WorkshopDetail, WorkshopId, WorkshopReview,
    WorkshopStatus, WorkshopValidationError, mean_rating,
};
pub use self::workshop_service::WorkshopService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use roadguard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
