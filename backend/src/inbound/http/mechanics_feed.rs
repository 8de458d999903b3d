//! Public mechanic map feed at `GET /api/mechanics`.
//!
//! Served outside `/api/v1` and without a session so the landing page map
//! can load it. With `?lat=..&lng=..` each entry also carries the distance
//! and a call-out quote, nearest first.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::MechanicLocation;
use crate::domain::{Coordinates, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, location_error, missing_field_error};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    /// Caller latitude; must come with `lng`.
    pub lat: Option<f64>,
    /// Caller longitude; must come with `lat`.
    pub lng: Option<f64>,
}

impl FeedQuery {
    fn origin(&self) -> Result<Option<Coordinates>, Error> {
        match (self.lat, self.lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => Coordinates::try_new(lat, lng)
                .map(Some)
                .map_err(location_error),
            (Some(_), None) => Err(missing_field_error(FieldName::new("lng"))),
            (None, Some(_)) => Err(missing_field_error(FieldName::new("lat"))),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/mechanics",
    params(FeedQuery),
    responses(
        (status = 200, description = "Mechanics with demo positions", body = [MechanicLocation]),
        (status = 400, description = "Only one of lat/lng supplied", body = Error)
    ),
    tags = ["mechanics"],
    operation_id = "mechanicFeed",
    security([])
)]
#[get("/mechanics")]
pub async fn mechanic_feed(
    state: web::Data<HttpState>,
    query: web::Query<FeedQuery>,
) -> ApiResult<web::Json<Vec<MechanicLocation>>> {
    let origin = query.origin()?;
    Ok(web::Json(state.mechanics.locate(origin).await?))
}
