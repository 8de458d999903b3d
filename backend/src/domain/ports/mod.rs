//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, mailer) are implemented by outbound adapters.
//! Driving ports are the use-case traits HTTP handlers call.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod mechanic_directory;
mod notification_inbox;
mod notification_repository;
mod otp_mailer;
mod otp_verification;
mod request_workflow;
mod service_request_repository;
mod user_repository;
mod workshop_repository;
mod workshop_reviews;

pub use accounts::Accounts;
#[cfg(test)]
pub use accounts::MockAccounts;
pub use mechanic_directory::{MechanicDirectory, MechanicLocation};
#[cfg(test)]
pub use mechanic_directory::MockMechanicDirectory;
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::NotificationInbox;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use otp_mailer::MockOtpMailer;
pub use otp_mailer::OtpMailer;
#[cfg(test)]
pub use otp_verification::MockOtpVerification;
pub use otp_verification::OtpVerification;
#[cfg(test)]
pub use request_workflow::MockRequestWorkflow;
pub use request_workflow::{
    AdminDashboard, RequestDetail, RequestExportRow, RequestWorkflow, ServiceRequestView,
};
#[cfg(test)]
pub use service_request_repository::MockServiceRequestRepository;
pub use service_request_repository::{ServiceRequestRepository, ServiceRequestRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use workshop_repository::MockWorkshopRepository;
pub use workshop_repository::{WorkshopRepository, WorkshopRepositoryError};
#[cfg(test)]
pub use workshop_reviews::MockWorkshopReviews;
pub use workshop_reviews::WorkshopReviews;
