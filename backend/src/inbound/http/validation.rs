//! Translation of payload validation failures into `invalid_request` errors.
//!
//! Every error carries `details: {field, code}` so clients can highlight the
//! offending input without parsing the message.

use serde_json::json;

use crate::domain::{
    CoordinateError, Error, LoginValidationError, RoleParseError, ServiceRequestValidationError,
    UserValidationError, WorkshopValidationError,
};

/// Machine-readable validation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    EmptyPassword,
    EmptyTitle,
    InvalidCoordinate,
    UnknownRole,
    UnknownAction,
    RatingOutOfRange,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::EmptyName => "empty_name",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::EmptyTitle => "empty_title",
            Self::InvalidCoordinate => "invalid_coordinate",
            Self::UnknownRole => "unknown_role",
            Self::UnknownAction => "unknown_action",
            Self::RatingOutOfRange => "rating_out_of_range",
        }
    }
}

/// JSON field name as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    invalid(
        name,
        ValidationCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap an optional payload field or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyName => ("name", ValidationCode::EmptyName),
        UserValidationError::EmptyEmail => ("email", ValidationCode::EmptyEmail),
        UserValidationError::InvalidEmail => ("email", ValidationCode::InvalidEmail),
        UserValidationError::EmptyPassword => ("password", ValidationCode::EmptyPassword),
    };
    invalid(field, code, err.to_string())
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail(inner) => user_validation_error(inner),
        LoginValidationError::EmptyPassword => user_validation_error(
            UserValidationError::EmptyPassword,
        ),
    }
}

pub(crate) fn role_error(err: RoleParseError) -> Error {
    invalid("role", ValidationCode::UnknownRole, err.to_string())
}

pub(crate) fn location_error(err: CoordinateError) -> Error {
    let field = match err {
        CoordinateError::NonFiniteLatitude => "lat",
        CoordinateError::NonFiniteLongitude => "lng",
    };
    invalid(field, ValidationCode::InvalidCoordinate, err.to_string())
}

pub(crate) fn request_validation_error(err: ServiceRequestValidationError) -> Error {
    match err {
        ServiceRequestValidationError::EmptyTitle => {
            invalid("title", ValidationCode::EmptyTitle, err.to_string())
        }
        ServiceRequestValidationError::Location(inner) => location_error(inner),
        ServiceRequestValidationError::UnknownAction(_) => {
            invalid("action", ValidationCode::UnknownAction, err.to_string())
        }
        // Only raised for stored rows, never for client input.
        ServiceRequestValidationError::UnknownStatus(_)
        | ServiceRequestValidationError::InconsistentAssignment { .. } => {
            Error::internal(err.to_string())
        }
    }
}

pub(crate) fn rating_error(err: WorkshopValidationError) -> Error {
    match err {
        WorkshopValidationError::RatingOutOfRange(_) => {
            invalid("rating", ValidationCode::RatingOutOfRange, err.to_string())
        }
        WorkshopValidationError::UnknownStatus(_) => Error::internal(err.to_string()),
    }
}
