//! PostgreSQL adapters for the repository ports, built on Diesel with
//! `diesel-async` and a `bb8` pool.
//!
//! Row structs and table definitions stay private to this module; only the
//! repositories, the pool and the migration runner are exported.
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use roadguard::outbound::persistence::{
//!     DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! let url = "postgres://roadguard@localhost/roadguard";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_notification_repository;
mod diesel_service_request_repository;
mod diesel_user_repository;
mod diesel_workshop_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_service_request_repository::DieselServiceRequestRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_workshop_repository::DieselWorkshopRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
