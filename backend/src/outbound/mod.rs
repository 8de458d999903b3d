//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel
//! - **mail**: OTP delivery over SMTP
//!
//! Adapters translate between domain types and infrastructure types and hold
//! no business rules.

pub mod mail;
pub mod persistence;
