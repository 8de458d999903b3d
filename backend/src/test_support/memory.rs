//! In-memory implementations of every repository port.
//!
//! One [`InMemoryStore`] backs all four ports so cross-table checks (such as
//! review eligibility) see the same data the workflow wrote.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::ports::{
    NotificationRepository, NotificationRepositoryError, ServiceRequestRepository,
    ServiceRequestRepositoryError, UserPersistenceError, UserRepository, WorkshopRepository,
    WorkshopRepositoryError,
};
use crate::domain::{
    Coordinates, Email, NewNotification, NewUser, NewWorkshopReview, Notification,
    NotificationId, ProfileUpdate, RequestId, RequestStatus, Role, ServiceRequest,
    ServiceRequestDraft, ServiceRequestRecord, User, UserId, UserRecord, Workshop, WorkshopId,
    WorkshopReview, WorkshopStatus,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    requests: Vec<ServiceRequest>,
    notifications: Vec<Notification>,
    workshops: Vec<Workshop>,
    reviews: Vec<WorkshopReview>,
    next_id: i64,
    ticks: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps keep "newest first" deterministic.
    fn stamp(&mut self, epoch: DateTime<Utc>) -> DateTime<Utc> {
        self.ticks += 1;
        epoch + TimeDelta::seconds(self.ticks)
    }

    fn duplicate_field(
        &self,
        except: Option<UserId>,
        email: &Email,
        phone: Option<&str>,
    ) -> Option<&'static str> {
        let others = || self.users.iter().filter(move |u| Some(u.id()) != except);
        if others().any(|u| u.email() == email) {
            return Some("email");
        }
        if phone.is_some() && others().any(|u| u.phone() == phone) {
            return Some("phone");
        }
        None
    }
}

/// Shared in-memory backing for the repository ports.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    epoch: DateTime<Utc>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::default(),
            epoch: Utc::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an open workshop with no reviews.
    pub fn add_workshop(&self, name: &str, location: Coordinates) -> WorkshopId {
        let mut tables = self.lock();
        let id = WorkshopId::new(tables.next_id());
        tables.workshops.push(Workshop {
            id,
            owner: None,
            name: name.to_owned(),
            description: String::new(),
            location,
            status: WorkshopStatus::Open,
            rating: 0.0,
        });
        id
    }

    /// Every stored notification, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn request(&self, id: RequestId) -> Option<ServiceRequest> {
        self.lock()
            .requests
            .iter()
            .find(|request| request.id() == id)
            .cloned()
    }
}

fn newest_first(mut requests: Vec<ServiceRequest>) -> Vec<ServiceRequest> {
    requests.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));
    requests
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        if let Some(field) = tables.duplicate_field(None, &user.email, user.phone.as_deref()) {
            return Err(UserPersistenceError::duplicate(field));
        }
        let id = UserId::new(tables.next_id());
        let created_at = tables.stamp(self.epoch);
        let stored = User::from(UserRecord {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role,
            phone: user.phone.clone(),
            verified: user.verified,
            created_at,
        });
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.iter().find(|u| u.email() == email).cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| u.role() == role)
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.lock();
        if let Some(field) = tables.duplicate_field(Some(id), update.email(), update.phone()) {
            return Err(UserPersistenceError::duplicate(field));
        }
        let Some(slot) = tables.users.iter_mut().find(|u| u.id() == id) else {
            return Ok(None);
        };
        let updated = User::from(UserRecord {
            id,
            name: update.name().to_owned(),
            email: update.email().clone(),
            password: slot.password().clone(),
            role: slot.role(),
            phone: update.phone().map(str::to_owned),
            verified: slot.is_verified(),
            created_at: slot.created_at(),
        });
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

#[async_trait]
impl ServiceRequestRepository for InMemoryStore {
    async fn insert(
        &self,
        requester: UserId,
        draft: &ServiceRequestDraft,
    ) -> Result<ServiceRequest, ServiceRequestRepositoryError> {
        let mut tables = self.lock();
        let id = RequestId::new(tables.next_id());
        let created_at = tables.stamp(self.epoch);
        let request = ServiceRequest::restore(ServiceRequestRecord {
            id,
            requester,
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            vehicle: draft.vehicle().map(str::to_owned),
            service_type: draft.service_type().map(str::to_owned),
            location: draft.location(),
            status: RequestStatus::Submitted,
            assigned_mechanic: None,
            mechanic_response: None,
            created_at,
        })
        .map_err(|err| ServiceRequestRepositoryError::query(err.to_string()))?;
        tables.requests.push(request.clone());
        Ok(request)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(self.request(id))
    }

    async fn save_progress(
        &self,
        request: &ServiceRequest,
    ) -> Result<(), ServiceRequestRepositoryError> {
        let mut tables = self.lock();
        let slot = tables
            .requests
            .iter_mut()
            .find(|stored| stored.id() == request.id())
            .ok_or_else(|| {
                ServiceRequestRepositoryError::query(format!(
                    "service request {} vanished before update",
                    request.id()
                ))
            })?;
        *slot = request.clone();
        Ok(())
    }

    async fn list_for_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let tables = self.lock();
        Ok(newest_first(
            tables
                .requests
                .iter()
                .filter(|r| r.requester() == requester)
                .cloned()
                .collect(),
        ))
    }

    async fn list_for_mechanic(
        &self,
        mechanic: UserId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let tables = self.lock();
        Ok(newest_first(
            tables
                .requests
                .iter()
                .filter(|r| r.assigned_mechanic() == Some(mechanic))
                .cloned()
                .collect(),
        ))
    }

    async fn list_unassigned(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let tables = self.lock();
        Ok(newest_first(
            tables
                .requests
                .iter()
                .filter(|r| r.assigned_mechanic().is_none())
                .cloned()
                .collect(),
        ))
    }

    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let all = newest_first(self.lock().requests.clone());
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(all.into_iter().take(limit).collect())
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut all = self.lock().requests.clone();
        all.sort_by_key(ServiceRequest::id);
        Ok(all)
    }

    async fn has_completed(
        &self,
        requester: UserId,
    ) -> Result<bool, ServiceRequestRepositoryError> {
        Ok(self
            .lock()
            .requests
            .iter()
            .any(|r| r.requester() == requester && r.status() == RequestStatus::Completed))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut tables = self.lock();
        let id = NotificationId::new(tables.next_id());
        let created_at = tables.stamp(self.epoch);
        let stored = Notification {
            id,
            target_role: notification.target_role,
            target_user: notification.target_user,
            message: notification.message.clone(),
            created_at,
            read: false,
        };
        tables.notifications.push(stored.clone());
        Ok(stored)
    }

    async fn list_visible_to(
        &self,
        user: UserId,
        role: Role,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut visible: Vec<Notification> = self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.is_visible_to(user, role))
            .cloned()
            .collect();
        visible.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(visible)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user: UserId,
        role: Role,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut tables = self.lock();
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.is_visible_to(user, role))
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl WorkshopRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Workshop>, WorkshopRepositoryError> {
        Ok(self.lock().workshops.clone())
    }

    async fn find_by_id(&self, id: WorkshopId) -> Result<Option<Workshop>, WorkshopRepositoryError> {
        Ok(self.lock().workshops.iter().find(|w| w.id == id).cloned())
    }

    async fn list_reviews(
        &self,
        workshop: WorkshopId,
    ) -> Result<Vec<WorkshopReview>, WorkshopRepositoryError> {
        let mut reviews: Vec<WorkshopReview> = self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.workshop == workshop)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(reviews)
    }

    async fn insert_review(
        &self,
        review: &NewWorkshopReview,
    ) -> Result<WorkshopReview, WorkshopRepositoryError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let created_at = tables.stamp(self.epoch);
        let stored = WorkshopReview {
            id,
            user: review.user,
            workshop: review.workshop,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at,
        };
        tables.reviews.push(stored.clone());
        Ok(stored)
    }

    async fn set_rating(&self, id: WorkshopId, rating: f64) -> Result<(), WorkshopRepositoryError> {
        if let Some(workshop) = self.lock().workshops.iter_mut().find(|w| w.id == id) {
            workshop.rating = rating;
        }
        Ok(())
    }
}
