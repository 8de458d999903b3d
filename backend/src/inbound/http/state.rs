//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see the driving
//! ports, so tests can hand in mocks or in-memory wiring.

use std::sync::Arc;

use crate::domain::ports::{
    Accounts, MechanicDirectory, NotificationInbox, OtpVerification, RequestWorkflow,
    WorkshopReviews,
};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn Accounts>,
    pub requests: Arc<dyn RequestWorkflow>,
    pub workshops: Arc<dyn WorkshopReviews>,
    pub notifications: Arc<dyn NotificationInbox>,
    pub otp: Arc<dyn OtpVerification>,
    pub mechanics: Arc<dyn MechanicDirectory>,
}
