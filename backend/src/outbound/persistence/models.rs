//! Diesel row structs. Private to the persistence layer; repositories turn
//! them into domain types before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{notifications, service_requests, users, workshop_reviews, workshops};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role: String,
    pub phone: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
    pub role: &'a str,
    pub phone: Option<&'a str>,
    pub verified: bool,
}

/// Profile columns. `phone` is written even when `None` so a cleared phone
/// number is persisted.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Service requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = service_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRequestRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub vehicle: Option<String>,
    pub service_type: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub status: String,
    pub assigned_mechanic_id: Option<i64>,
    pub mechanic_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = service_requests)]
pub(crate) struct NewServiceRequestRow<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub vehicle: Option<&'a str>,
    pub service_type: Option<&'a str>,
    pub lat: f64,
    pub lng: f64,
    pub status: &'a str,
}

/// Mutable workflow columns; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = service_requests)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ServiceRequestProgress<'a> {
    pub status: &'a str,
    pub assigned_mechanic_id: Option<i64>,
    pub mechanic_response: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: i64,
    pub role: Option<String>,
    pub user_id: Option<i64>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub role: Option<&'a str>,
    pub user_id: Option<i64>,
    pub message: &'a str,
}

// ---------------------------------------------------------------------------
// Workshops
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workshops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkshopRow {
    pub id: i64,
    pub owner_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub status: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workshop_reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkshopReviewRow {
    pub id: i64,
    pub user_id: i64,
    pub workshop_id: i64,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workshop_reviews)]
pub(crate) struct NewWorkshopReviewRow<'a> {
    pub user_id: i64,
    pub workshop_id: i64,
    pub rating: i16,
    pub comment: Option<&'a str>,
}
