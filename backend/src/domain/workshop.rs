//! Workshops and their reviews.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Coordinates, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct WorkshopId(i64);

impl WorkshopId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WorkshopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkshopValidationError {
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),
    #[error("unknown workshop status '{0}'")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkshopStatus {
    Open,
    Closed,
}

impl WorkshopStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for WorkshopStatus {
    type Err = WorkshopValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(WorkshopValidationError::UnknownStatus(s.to_owned())),
        }
    }
}

/// Review score between one and five stars inclusive.
///
/// Documented in OpenAPI as a plain integer; the range is enforced on
/// construction.
///
/// # Examples
/// ```
/// use roadguard::domain::Rating;
///
/// assert_eq!(Rating::try_new(4).unwrap().get(), 4);
/// assert!(Rating::try_new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "i64")]
#[schema(value_type = i64)]
pub struct Rating(u8);

impl Rating {
    pub fn try_new(raw: i64) -> Result<Self, WorkshopValidationError> {
        match u8::try_from(raw) {
            Ok(stars @ 1..=5) => Ok(Self(stars)),
            _ => Err(WorkshopValidationError::RatingOutOfRange(raw)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = WorkshopValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        Self::from(value.0)
    }
}

/// Unweighted mean of `ratings`; `0.0` when there are none.
pub fn mean_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: u32 = ratings.iter().map(|r| u32::from(r.get())).sum();
    f64::from(total) / ratings.len() as f64
}

/// Workshop listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: WorkshopId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
    #[schema(example = "Ring Road Motors")]
    pub name: String,
    pub description: String,
    pub location: Coordinates,
    pub status: WorkshopStatus,
    /// Mean of all review ratings, `0.0` before the first review.
    pub rating: f64,
}

/// Persisted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopReview {
    pub id: i64,
    pub user: UserId,
    pub workshop: WorkshopId,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkshopReview {
    pub user: UserId,
    pub workshop: WorkshopId,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// A workshop with its reviews, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopDetail {
    pub workshop: Workshop,
    pub reviews: Vec<WorkshopReview>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(300)]
    fn rating_rejects_out_of_range(#[case] raw: i64) {
        assert_eq!(
            Rating::try_new(raw),
            Err(WorkshopValidationError::RatingOutOfRange(raw))
        );
    }

    #[rstest]
    #[case(&[5, 3, 4], 4.0)]
    #[case(&[1], 1.0)]
    #[case(&[5, 4], 4.5)]
    #[case(&[], 0.0)]
    fn mean_is_unweighted(#[case] raw: &[i64], #[case] expected: f64) {
        let ratings: Vec<Rating> = raw
            .iter()
            .map(|r| Rating::try_new(*r).expect("valid rating"))
            .collect();
        assert!((mean_rating(&ratings) - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    fn rating_deserialises_with_validation() {
        assert!(serde_json::from_str::<Rating>("3").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[rstest]
    fn rating_schema_is_an_integer() {
        use utoipa::PartialSchema;

        let schema = serde_json::to_value(<Rating as PartialSchema>::schema()).expect("schema json");
        assert_eq!(schema["type"], "integer");
    }
}
