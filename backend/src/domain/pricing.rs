//! Flat-rate call-out quote.

/// Fixed call-out charge.
pub const BASE_FARE: f64 = 150.0;
/// Charge per kilometre travelled by the mechanic.
pub const PER_KM_FARE: f64 = 12.0;

/// Estimated fare for a call-out of `distance_km`, rounded to two decimals.
///
/// # Examples
/// ```
/// use roadguard::domain::flat_rate_fare;
///
/// assert_eq!(flat_rate_fare(0.0), 150.0);
/// assert_eq!(flat_rate_fare(2.5), 180.0);
/// ```
pub fn flat_rate_fare(distance_km: f64) -> f64 {
    let raw = BASE_FARE + PER_KM_FARE * distance_km.max(0.0);
    (raw * 100.0).round() / 100.0
}
