//! PostgreSQL-backed [`ServiceRequestRepository`].
//!
//! Rows pass through [`ServiceRequest::restore`], so a row that breaks the
//! status/assignee rule surfaces as a query error instead of reaching the
//! workflow.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ServiceRequestRepository, ServiceRequestRepositoryError};
use crate::domain::{
    Coordinates, RequestId, RequestStatus, ServiceRequest, ServiceRequestDraft,
    ServiceRequestRecord, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewServiceRequestRow, ServiceRequestProgress, ServiceRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::service_requests;

#[derive(Clone)]
pub struct DieselServiceRequestRepository {
    pool: DbPool,
}

impl DieselServiceRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ServiceRequestRepositoryError {
    map_pool_error(error, ServiceRequestRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ServiceRequestRepositoryError {
    map_diesel_error(
        error,
        ServiceRequestRepositoryError::query,
        ServiceRequestRepositoryError::connection,
    )
}

fn row_to_request(row: ServiceRequestRow) -> Result<ServiceRequest, ServiceRequestRepositoryError> {
    let ServiceRequestRow {
        id,
        user_id,
        title,
        description,
        vehicle,
        service_type,
        lat,
        lng,
        status,
        assigned_mechanic_id,
        mechanic_response,
        created_at,
    } = row;
    let corrupt =
        |err: String| ServiceRequestRepositoryError::query(format!("stored request {id}: {err}"));

    let status: RequestStatus = status.parse().map_err(|err| corrupt(format!("{err}")))?;
    let location = Coordinates::try_new(lat, lng).map_err(|err| corrupt(err.to_string()))?;
    ServiceRequest::restore(ServiceRequestRecord {
        id: RequestId::new(id),
        requester: UserId::new(user_id),
        title,
        description,
        vehicle,
        service_type,
        location,
        status,
        assigned_mechanic: assigned_mechanic_id.map(UserId::new),
        mechanic_response,
        created_at,
    })
    .map_err(|err| corrupt(err.to_string()))
}

fn rows_to_requests(
    rows: Vec<ServiceRequestRow>,
) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
    rows.into_iter().map(row_to_request).collect()
}

/// Newest first, ties broken by id so equal timestamps stay stable.
macro_rules! newest_first {
    ($query:expr) => {
        $query
            .order((
                service_requests::created_at.desc(),
                service_requests::id.desc(),
            ))
            .select(ServiceRequestRow::as_select())
    };
}

#[async_trait]
impl ServiceRequestRepository for DieselServiceRequestRepository {
    async fn insert(
        &self,
        requester: UserId,
        draft: &ServiceRequestDraft,
    ) -> Result<ServiceRequest, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let location = draft.location();
        let row = NewServiceRequestRow {
            user_id: requester.get(),
            title: draft.title(),
            description: draft.description(),
            vehicle: draft.vehicle(),
            service_type: draft.service_type(),
            lat: location.lat(),
            lng: location.lng(),
            status: RequestStatus::Submitted.as_str(),
        };
        let stored: ServiceRequestRow = diesel::insert_into(service_requests::table)
            .values(&row)
            .returning(ServiceRequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_request(stored)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        service_requests::table
            .find(id.get())
            .select(ServiceRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_request)
            .transpose()
    }

    async fn save_progress(
        &self,
        request: &ServiceRequest,
    ) -> Result<(), ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let progress = ServiceRequestProgress {
            status: request.status().as_str(),
            assigned_mechanic_id: request.assigned_mechanic().map(UserId::get),
            mechanic_response: request.mechanic_response(),
        };
        let updated = diesel::update(service_requests::table.find(request.id().get()))
            .set(&progress)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(ServiceRequestRepositoryError::query(format!(
                "service request {} vanished before update",
                request.id()
            )));
        }
        Ok(())
    }

    async fn list_for_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = newest_first!(
            service_requests::table.filter(service_requests::user_id.eq(requester.get()))
        )
        .load(&mut conn)
        .await
        .map_err(diesel_error)?;
        rows_to_requests(rows)
    }

    async fn list_for_mechanic(
        &self,
        mechanic: UserId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = newest_first!(
            service_requests::table
                .filter(service_requests::assigned_mechanic_id.eq(mechanic.get()))
        )
        .load(&mut conn)
        .await
        .map_err(diesel_error)?;
        rows_to_requests(rows)
    }

    async fn list_unassigned(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = newest_first!(
            service_requests::table.filter(service_requests::assigned_mechanic_id.is_null())
        )
        .load(&mut conn)
        .await
        .map_err(diesel_error)?;
        rows_to_requests(rows)
    }

    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = newest_first!(service_requests::table)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_requests(rows)
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = service_requests::table
            .order(service_requests::id.asc())
            .select(ServiceRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_requests(rows)
    }

    async fn has_completed(
        &self,
        requester: UserId,
    ) -> Result<bool, ServiceRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::select(diesel::dsl::exists(
            service_requests::table
                .filter(service_requests::user_id.eq(requester.get()))
                .filter(service_requests::status.eq(RequestStatus::Completed.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn row(status: &str, assignee: Option<i64>) -> ServiceRequestRow {
        ServiceRequestRow {
            id: 11,
            user_id: 2,
            title: "Battery dead".to_owned(),
            description: String::new(),
            vehicle: Some("Swift".to_owned()),
            service_type: None,
            lat: 28.6,
            lng: 77.2,
            status: status.to_owned(),
            assigned_mechanic_id: assignee,
            mechanic_response: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("Submitted", None, RequestStatus::Submitted)]
    #[case("pending", Some(3), RequestStatus::Pending)]
    #[case("enroute", Some(3), RequestStatus::Enroute)]
    fn valid_rows_restore(
        #[case] status: &str,
        #[case] assignee: Option<i64>,
        #[case] expected: RequestStatus,
    ) {
        let request = row_to_request(row(status, assignee)).expect("valid row");
        assert_eq!(request.status(), expected);
        assert_eq!(request.assigned_mechanic(), assignee.map(UserId::new));
    }

    #[rstest]
    #[case("pending", None)]
    #[case("submitted", Some(3))]
    #[case("teleported", None)]
    fn inconsistent_rows_are_rejected(#[case] status: &str, #[case] assignee: Option<i64>) {
        let err = row_to_request(row(status, assignee)).expect_err("corrupt row");
        assert!(err.to_string().contains("stored request 11"));
    }
}
