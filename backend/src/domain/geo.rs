//! Geographic value objects and distance helpers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

const EARTH_RADIUS_KM: f64 = 6371.0;
const DEMO_BASE_LAT: f64 = 28.7;
const DEMO_BASE_LNG: f64 = 77.1;
const DEMO_STEP: f64 = 0.01;

/// Validation errors for [`Coordinates`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude must be a finite number")]
    NonFiniteLatitude,
    #[error("longitude must be a finite number")]
    NonFiniteLongitude,
}

/// A latitude/longitude pair in decimal degrees.
///
/// Only finiteness is checked; ranges are left to the caller.
///
/// # Examples
/// ```
/// use roadguard::domain::Coordinates;
///
/// let delhi = Coordinates::try_new(28.70, 77.10).unwrap();
/// assert_eq!(delhi.haversine_km(delhi), 0.0);
/// assert!(Coordinates::try_new(f64::NAN, 77.10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    #[schema(example = 28.7)]
    lat: f64,
    #[schema(example = 77.1)]
    lng: f64,
}

impl Coordinates {
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() {
            return Err(CoordinateError::NonFiniteLatitude);
        }
        if !lng.is_finite() {
            return Err(CoordinateError::NonFiniteLongitude);
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(self) -> f64 {
        self.lat
    }

    pub fn lng(self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn haversine_km(self, other: Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// Placeholder position for a mechanic until live tracking exists.
///
/// Mechanics are spread over five points near Delhi by `id % 5`.
pub fn demo_mechanic_coordinates(id: UserId) -> Coordinates {
    // rem_euclid keeps negative ids on the same five points.
    let offset = id.get().rem_euclid(5) as f64 * DEMO_STEP;
    Coordinates {
        lat: DEMO_BASE_LAT + offset,
        lng: DEMO_BASE_LNG + offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN, 1.0, CoordinateError::NonFiniteLatitude)]
    #[case(f64::INFINITY, 1.0, CoordinateError::NonFiniteLatitude)]
    #[case(1.0, f64::NEG_INFINITY, CoordinateError::NonFiniteLongitude)]
    fn rejects_non_finite(#[case] lat: f64, #[case] lng: f64, #[case] expected: CoordinateError) {
        assert_eq!(Coordinates::try_new(lat, lng), Err(expected));
    }

    #[rstest]
    fn identical_points_are_zero_apart() {
        let here = Coordinates::try_new(28.70, 77.10).expect("finite");
        assert_eq!(here.haversine_km(here), 0.0);
    }

    #[rstest]
    fn distance_is_symmetric_and_plausible() {
        let delhi = Coordinates::try_new(28.6139, 77.2090).expect("finite");
        let agra = Coordinates::try_new(27.1767, 78.0081).expect("finite");
        let there = delhi.haversine_km(agra);
        let back = agra.haversine_km(delhi);
        assert!((there - back).abs() < 1e-9);
        assert!((175.0..185.0).contains(&there), "got {there}");
    }

    #[rstest]
    #[case(5, 28.70, 77.10)]
    #[case(1, 28.71, 77.11)]
    #[case(7, 28.72, 77.12)]
    #[case(14, 28.74, 77.14)]
    fn demo_coordinates_cycle_by_id(#[case] id: i64, #[case] lat: f64, #[case] lng: f64) {
        let coords = demo_mechanic_coordinates(UserId::new(id));
        assert!((coords.lat() - lat).abs() < 1e-9);
        assert!((coords.lng() - lng).abs() < 1e-9);
    }
}
