//! Driving port for the public mechanic location feed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Coordinates, Error, UserId};

/// One mechanic on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MechanicLocation {
    pub id: UserId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    /// Kilometres from the caller, present when a position was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Flat-rate quote for the call-out, present with `distance_km`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_fare: Option<f64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MechanicDirectory: Send + Sync {
    /// Every mechanic; nearest first when `origin` is given.
    async fn locate(&self, origin: Option<Coordinates>) -> Result<Vec<MechanicLocation>, Error>;
}
