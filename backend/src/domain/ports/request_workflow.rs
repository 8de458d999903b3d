//! Driving port for the service request lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Actor, Coordinates, Error, RequestAction, RequestId, RequestStatus, ServiceRequest,
    ServiceRequestDraft, UserId, UserSummary,
};

/// Service request as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestView {
    pub id: RequestId,
    pub requester: UserId,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub location: Coordinates,
    pub status: RequestStatus,
    pub assigned_mechanic: Option<UserId>,
    pub mechanic_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ServiceRequest> for ServiceRequestView {
    fn from(value: &ServiceRequest) -> Self {
        Self {
            id: value.id(),
            requester: value.requester(),
            title: value.title().to_owned(),
            description: value.description().to_owned(),
            vehicle: value.vehicle().map(str::to_owned),
            service_type: value.service_type().map(str::to_owned),
            location: value.location(),
            status: value.status(),
            assigned_mechanic: value.assigned_mechanic(),
            mechanic_response: value.mechanic_response().map(str::to_owned),
            created_at: value.created_at(),
        }
    }
}

/// Admin overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Requests waiting for a mechanic, newest first.
    pub unassigned: Vec<ServiceRequestView>,
    /// The most recent requests regardless of state.
    pub recent: Vec<ServiceRequestView>,
    pub mechanics: Vec<UserSummary>,
    pub users: Vec<UserSummary>,
}

/// One request with its participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    pub request: ServiceRequestView,
    pub requester: Option<UserSummary>,
    pub mechanic: Option<UserSummary>,
}

/// Flattened request row for spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestExportRow {
    pub id: RequestId,
    pub title: String,
    pub status: RequestStatus,
    /// Requester name, empty when the account is gone.
    pub user: String,
    /// Assigned mechanic name, empty when unassigned.
    pub mechanic: String,
    pub created_at: DateTime<Utc>,
}

/// Use-cases driving a request from submission to completion.
///
/// Every method takes the authenticated caller and enforces the role rules
/// itself; handlers only resolve the session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestWorkflow: Send + Sync {
    /// Create a `submitted` request and notify every admin.
    async fn submit(
        &self,
        actor: Actor,
        draft: ServiceRequestDraft,
    ) -> Result<ServiceRequestView, Error>;

    /// Assign `mechanic` and notify them. Replaces any earlier assignment.
    async fn assign(
        &self,
        actor: Actor,
        request: RequestId,
        mechanic: UserId,
    ) -> Result<ServiceRequestView, Error>;

    /// Apply the assigned mechanic's response.
    async fn respond(
        &self,
        actor: Actor,
        request: RequestId,
        action: RequestAction,
        comment: Option<String>,
    ) -> Result<ServiceRequestView, Error>;

    /// The caller's own requests.
    async fn user_dashboard(&self, actor: Actor) -> Result<Vec<ServiceRequestView>, Error>;

    /// Requests assigned to the calling mechanic.
    async fn mechanic_dashboard(&self, actor: Actor) -> Result<Vec<ServiceRequestView>, Error>;

    async fn admin_dashboard(&self, actor: Actor) -> Result<AdminDashboard, Error>;

    async fn request_detail(&self, actor: Actor, request: RequestId)
    -> Result<RequestDetail, Error>;

    /// Every request, flattened for export. Admin only.
    async fn export_requests(&self, actor: Actor) -> Result<Vec<RequestExportRow>, Error>;
}
