//! Roadside service request aggregate and its status lifecycle.
//!
//! `submitted -> pending -> {accepted | rejected}`, then
//! `accepted -> enroute -> completed`. A rejected request drops its mechanic
//! and waits for an admin to assign someone else.
//!
//! The assigned mechanic is present exactly while the status is one of
//! pending, accepted, enroute or completed. Only [`ServiceRequest::assign`]
//! and [`ServiceRequest::respond`] change either field, and
//! [`ServiceRequest::restore`] refuses stored rows that break the rule.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::non_blank;
use super::{CoordinateError, Coordinates, Role, UserId};

/// Database-assigned request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RequestId(i64);

impl RequestId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for request inputs and stored rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceRequestValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    Location(#[from] CoordinateError),
    #[error("unknown request status '{0}'")]
    UnknownStatus(String),
    #[error("unknown action '{0}'; expected accept, reject, start or complete")]
    UnknownAction(String),
    #[error("request {id} has status {status} but assignee {assignee:?}")]
    InconsistentAssignment {
        id: RequestId,
        status: RequestStatus,
        assignee: Option<UserId>,
    },
}

/// Lifecycle state of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    Pending,
    Accepted,
    Rejected,
    Enroute,
    Completed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Enroute => "enroute",
            Self::Completed => "completed",
        }
    }

    /// Whether a request in this state carries an assigned mechanic.
    pub fn has_assignee(self) -> bool {
        match self {
            Self::Pending | Self::Accepted | Self::Enroute | Self::Completed => true,
            Self::Submitted | Self::Rejected => false,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ServiceRequestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older rows were written with a capitalised "Submitted".
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "enroute" => Ok(Self::Enroute),
            "completed" => Ok(Self::Completed),
            _ => Err(ServiceRequestValidationError::UnknownStatus(s.to_owned())),
        }
    }
}

/// Mechanic response to an assigned request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Accept,
    Reject,
    Start,
    Complete,
}

impl RequestAction {
    /// The status a request moves to when this action is applied.
    pub fn resulting_status(self) -> RequestStatus {
        match self {
            Self::Accept => RequestStatus::Accepted,
            Self::Reject => RequestStatus::Rejected,
            Self::Start => RequestStatus::Enroute,
            Self::Complete => RequestStatus::Completed,
        }
    }
}

impl FromStr for RequestAction {
    type Err = ServiceRequestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "start" => Ok(Self::Start),
            "complete" => Ok(Self::Complete),
            _ => Err(ServiceRequestValidationError::UnknownAction(s.to_owned())),
        }
    }
}

/// Validated request details supplied by a motorist.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequestDraft {
    title: String,
    description: String,
    vehicle: Option<String>,
    service_type: Option<String>,
    location: Coordinates,
}

impl ServiceRequestDraft {
    pub fn try_new(
        title: &str,
        description: &str,
        vehicle: Option<String>,
        service_type: Option<String>,
        lat: f64,
        lng: f64,
    ) -> Result<Self, ServiceRequestValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceRequestValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_owned(),
            description: description.trim().to_owned(),
            vehicle: non_blank(vehicle),
            service_type: non_blank(service_type),
            location: Coordinates::try_new(lat, lng)?,
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn vehicle(&self) -> Option<&str> {
        self.vehicle.as_deref()
    }

    pub fn service_type(&self) -> Option<&str> {
        self.service_type.as_deref()
    }

    pub fn location(&self) -> Coordinates {
        self.location
    }
}

/// Stored request row, before the assignment rule is checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequestRecord {
    pub id: RequestId,
    pub requester: UserId,
    pub title: String,
    pub description: String,
    pub vehicle: Option<String>,
    pub service_type: Option<String>,
    pub location: Coordinates,
    pub status: RequestStatus,
    pub assigned_mechanic: Option<UserId>,
    pub mechanic_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A persisted roadside service request.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use roadguard::domain::{
///     Coordinates, RequestAction, RequestId, RequestStatus, ServiceRequest,
///     ServiceRequestRecord, UserId,
/// };
///
/// let mut request = ServiceRequest::restore(ServiceRequestRecord {
///     id: RequestId::new(1),
///     requester: UserId::new(2),
///     title: "Flat tyre".to_owned(),
///     description: String::new(),
///     vehicle: None,
///     service_type: None,
///     location: Coordinates::try_new(28.70, 77.10).unwrap(),
///     status: RequestStatus::Submitted,
///     assigned_mechanic: None,
///     mechanic_response: None,
///     created_at: Utc::now(),
/// })
/// .unwrap();
/// request.assign(UserId::new(3));
/// request.respond(RequestAction::Reject, None);
/// assert_eq!(request.status(), RequestStatus::Rejected);
/// assert_eq!(request.assigned_mechanic(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    record: ServiceRequestRecord,
}

impl ServiceRequest {
    /// Rebuild a request from storage, checking the assignment rule.
    pub fn restore(record: ServiceRequestRecord) -> Result<Self, ServiceRequestValidationError> {
        if record.status.has_assignee() != record.assigned_mechanic.is_some() {
            return Err(ServiceRequestValidationError::InconsistentAssignment {
                id: record.id,
                status: record.status,
                assignee: record.assigned_mechanic,
            });
        }
        Ok(Self { record })
    }

    /// Bind `mechanic` to the request and mark it pending.
    ///
    /// Any previous assignment is replaced.
    pub fn assign(&mut self, mechanic: UserId) {
        self.record.status = RequestStatus::Pending;
        self.record.assigned_mechanic = Some(mechanic);
    }

    /// Apply a mechanic's response. A non-blank `comment` replaces the
    /// stored response text.
    pub fn respond(&mut self, action: RequestAction, comment: Option<&str>) {
        let status = action.resulting_status();
        self.record.status = status;
        if !status.has_assignee() {
            self.record.assigned_mechanic = None;
        }
        if let Some(text) = comment.map(str::trim).filter(|text| !text.is_empty()) {
            self.record.mechanic_response = Some(text.to_owned());
        }
    }

    /// Admins, the requester and the assigned mechanic may view a request.
    pub fn is_visible_to(&self, viewer: UserId, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::User | Role::Mechanic => {
                viewer == self.record.requester || Some(viewer) == self.record.assigned_mechanic
            }
        }
    }

    pub fn id(&self) -> RequestId {
        self.record.id
    }

    pub fn requester(&self) -> UserId {
        self.record.requester
    }

    pub fn title(&self) -> &str {
        self.record.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.record.description.as_str()
    }

    pub fn vehicle(&self) -> Option<&str> {
        self.record.vehicle.as_deref()
    }

    pub fn service_type(&self) -> Option<&str> {
        self.record.service_type.as_deref()
    }

    pub fn location(&self) -> Coordinates {
        self.record.location
    }

    pub fn status(&self) -> RequestStatus {
        self.record.status
    }

    pub fn assigned_mechanic(&self) -> Option<UserId> {
        self.record.assigned_mechanic
    }

    pub fn mechanic_response(&self) -> Option<&str> {
        self.record.mechanic_response.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }

    /// Stored field view, used by repositories to persist changes.
    pub fn as_record(&self) -> &ServiceRequestRecord {
        &self.record
    }
}

#[cfg(test)]
mod tests;
