//! Port for service request persistence.

use async_trait::async_trait;

use crate::domain::{RequestId, ServiceRequest, ServiceRequestDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by service request repository adapters.
    pub enum ServiceRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "service request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "service request repository query failed: {message}",
    }
}

/// Reads and writes service requests. Every list is newest first unless
/// stated otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Insert a `submitted`, unassigned request owned by `requester`.
    async fn insert(
        &self,
        requester: UserId,
        draft: &ServiceRequestDraft,
    ) -> Result<ServiceRequest, ServiceRequestRepositoryError>;

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError>;

    /// Persist status, assignee and mechanic response of `request`.
    async fn save_progress(
        &self,
        request: &ServiceRequest,
    ) -> Result<(), ServiceRequestRepositoryError>;

    async fn list_for_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;

    async fn list_for_mechanic(
        &self,
        mechanic: UserId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;

    /// Requests with no assigned mechanic.
    async fn list_unassigned(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;

    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;

    /// Every request, ordered by id.
    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError>;

    /// Whether `requester` owns at least one completed request.
    async fn has_completed(&self, requester: UserId)
    -> Result<bool, ServiceRequestRepositoryError>;
}
