//! Service request lifecycle implementing the [`RequestWorkflow`] port.
//!
//! Each mutation persists the request first and writes notifications
//! afterwards. A failed notification insert is logged and swallowed; the
//! status change stands.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::account_service::map_user_error;
use crate::domain::notification::{
    assignment_message, new_request_message, rejection_message, status_message,
};
use crate::domain::ports::{
    AdminDashboard, NotificationRepository, RequestDetail, RequestExportRow, RequestWorkflow,
    ServiceRequestRepository, ServiceRequestRepositoryError, ServiceRequestView, UserRepository,
};
use crate::domain::{
    Actor, Error, NewNotification, RequestAction, RequestId, Role, ServiceRequest,
    ServiceRequestDraft, UserId, UserSummary,
};

/// Number of requests shown in the admin "recent" list.
pub const RECENT_REQUEST_LIMIT: i64 = 50;

pub(crate) fn map_request_error(error: ServiceRequestRepositoryError) -> Error {
    match error {
        ServiceRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("service request repository unavailable: {message}"))
        }
        ServiceRequestRepositoryError::Query { message } => {
            Error::internal(format!("service request repository error: {message}"))
        }
    }
}

fn views(requests: &[ServiceRequest]) -> Vec<ServiceRequestView> {
    requests.iter().map(ServiceRequestView::from).collect()
}

/// Drives requests through submission, assignment and mechanic responses.
#[derive(Clone)]
pub struct RequestWorkflowService<U, R, N> {
    users: Arc<U>,
    requests: Arc<R>,
    notifications: Arc<N>,
}

impl<U, R, N> RequestWorkflowService<U, R, N> {
    pub fn new(users: Arc<U>, requests: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            users,
            requests,
            notifications,
        }
    }
}

impl<U, R, N> RequestWorkflowService<U, R, N>
where
    U: UserRepository,
    R: ServiceRequestRepository,
    N: NotificationRepository,
{
    async fn load(&self, id: RequestId) -> Result<ServiceRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(map_request_error)?
            .ok_or_else(|| Error::not_found(format!("service request {id} not found")))
    }

    async fn notify(&self, request: RequestId, notification: NewNotification) {
        if let Err(error) = self.notifications.insert(&notification).await {
            warn!(
                request_id = %request,
                target_user = ?notification.target_user,
                %error,
                "notification insert failed"
            );
        }
    }

    async fn notify_admins(&self, request: RequestId, message: &str) {
        let admins = match self.users.list_by_role(Role::Admin).await {
            Ok(admins) => admins,
            Err(error) => {
                warn!(request_id = %request, %error, "could not list admins to notify");
                return;
            }
        };
        for admin in admins {
            self.notify(
                request,
                NewNotification::for_user(admin.id(), Role::Admin, message),
            )
            .await;
        }
    }

    async fn summary_of(&self, id: UserId) -> Result<Option<UserSummary>, Error> {
        Ok(self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.summary()))
    }

    async fn summaries_by_role(&self, role: Role) -> Result<Vec<UserSummary>, Error> {
        Ok(self
            .users
            .list_by_role(role)
            .await
            .map_err(map_user_error)?
            .iter()
            .map(crate::domain::User::summary)
            .collect())
    }
}

#[async_trait]
impl<U, R, N> RequestWorkflow for RequestWorkflowService<U, R, N>
where
    U: UserRepository,
    R: ServiceRequestRepository,
    N: NotificationRepository,
{
    async fn submit(
        &self,
        actor: Actor,
        draft: ServiceRequestDraft,
    ) -> Result<ServiceRequestView, Error> {
        let actor = actor.require(Role::User)?;
        let request = self
            .requests
            .insert(actor.id, &draft)
            .await
            .map_err(map_request_error)?;
        info!(request_id = %request.id(), requester = %actor.id, "service request submitted");

        self.notify_admins(
            request.id(),
            &new_request_message(request.id(), request.title()),
        )
        .await;
        Ok(ServiceRequestView::from(&request))
    }

    async fn assign(
        &self,
        actor: Actor,
        request_id: RequestId,
        mechanic_id: UserId,
    ) -> Result<ServiceRequestView, Error> {
        actor.require(Role::Admin)?;
        let mut request = self.load(request_id).await?;
        let mechanic = self
            .users
            .find_by_id(mechanic_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("mechanic {mechanic_id} not found")))?;
        if mechanic.role() != Role::Mechanic {
            return Err(Error::invalid_request(format!(
                "user {mechanic_id} is not a mechanic"
            )));
        }

        request.assign(mechanic.id());
        self.requests
            .save_progress(&request)
            .await
            .map_err(map_request_error)?;
        info!(request_id = %request_id, mechanic = %mechanic_id, "service request assigned");

        self.notify(
            request_id,
            NewNotification::for_user(
                mechanic.id(),
                Role::Mechanic,
                assignment_message(request_id, request.title()),
            ),
        )
        .await;
        Ok(ServiceRequestView::from(&request))
    }

    async fn respond(
        &self,
        actor: Actor,
        request_id: RequestId,
        action: RequestAction,
        comment: Option<String>,
    ) -> Result<ServiceRequestView, Error> {
        let actor = actor.require(Role::Mechanic)?;
        let mut request = self.load(request_id).await?;
        if request.assigned_mechanic() != Some(actor.id) {
            return Err(Error::forbidden("This request is not assigned to you."));
        }

        request.respond(action, comment.as_deref());
        self.requests
            .save_progress(&request)
            .await
            .map_err(map_request_error)?;
        info!(
            request_id = %request_id,
            mechanic = %actor.id,
            status = %request.status(),
            "mechanic responded"
        );

        match action {
            RequestAction::Reject => {
                self.notify_admins(request_id, &rejection_message(request_id))
                    .await;
            }
            RequestAction::Accept | RequestAction::Start | RequestAction::Complete => {
                self.notify(
                    request_id,
                    NewNotification::for_user(
                        request.requester(),
                        Role::User,
                        status_message(request_id, request.status()),
                    ),
                )
                .await;
            }
        }
        Ok(ServiceRequestView::from(&request))
    }

    async fn user_dashboard(&self, actor: Actor) -> Result<Vec<ServiceRequestView>, Error> {
        let actor = actor.require(Role::User)?;
        let requests = self
            .requests
            .list_for_requester(actor.id)
            .await
            .map_err(map_request_error)?;
        Ok(views(&requests))
    }

    async fn mechanic_dashboard(&self, actor: Actor) -> Result<Vec<ServiceRequestView>, Error> {
        let actor = actor.require(Role::Mechanic)?;
        let requests = self
            .requests
            .list_for_mechanic(actor.id)
            .await
            .map_err(map_request_error)?;
        Ok(views(&requests))
    }

    async fn admin_dashboard(&self, actor: Actor) -> Result<AdminDashboard, Error> {
        actor.require(Role::Admin)?;
        let unassigned = self
            .requests
            .list_unassigned()
            .await
            .map_err(map_request_error)?;
        let recent = self
            .requests
            .list_recent(RECENT_REQUEST_LIMIT)
            .await
            .map_err(map_request_error)?;
        Ok(AdminDashboard {
            unassigned: views(&unassigned),
            recent: views(&recent),
            mechanics: self.summaries_by_role(Role::Mechanic).await?,
            users: self.summaries_by_role(Role::User).await?,
        })
    }

    async fn request_detail(
        &self,
        actor: Actor,
        request_id: RequestId,
    ) -> Result<RequestDetail, Error> {
        let request = self.load(request_id).await?;
        if !request.is_visible_to(actor.id, actor.role) {
            return Err(Error::forbidden(format!(
                "not permitted to view service request {request_id}"
            )));
        }
        let requester = self.summary_of(request.requester()).await?;
        let mechanic = match request.assigned_mechanic() {
            Some(id) => self.summary_of(id).await?,
            None => None,
        };
        Ok(RequestDetail {
            request: ServiceRequestView::from(&request),
            requester,
            mechanic,
        })
    }

    async fn export_requests(&self, actor: Actor) -> Result<Vec<RequestExportRow>, Error> {
        actor.require(Role::Admin)?;
        let requests = self.requests.list_all().await.map_err(map_request_error)?;

        let mut names: HashMap<UserId, String> = HashMap::new();
        for role in [Role::User, Role::Mechanic, Role::Admin] {
            for user in self.users.list_by_role(role).await.map_err(map_user_error)? {
                names.insert(user.id(), user.name().to_owned());
            }
        }
        let name_of = |id: Option<UserId>| {
            id.and_then(|id| names.get(&id).cloned())
                .unwrap_or_default()
        };

        Ok(requests
            .iter()
            .map(|request| RequestExportRow {
                id: request.id(),
                title: request.title().to_owned(),
                status: request.status(),
                user: name_of(Some(request.requester())),
                mechanic: name_of(request.assigned_mechanic()),
                created_at: request.created_at(),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "request_workflow_service_tests.rs"]
mod tests;
