//! Venue domain entity
//!
//! The venue record is owned by the external venue directory; this service
//! keeps the fields it needs for ownership checks plus the derived rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityId;
use super::review::Score;

/// Unique identifier for a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VenueId(pub Uuid);

impl VenueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VenueId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for VenueId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running sum/count pair behind a venue's average rating.
///
/// Both halves are always written together so the mean can never be observed
/// half-updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RatingAggregate {
    pub sum: i64,
    pub count: i64,
}

impl RatingAggregate {
    pub fn new(sum: i64, count: i64) -> Self {
        Self { sum, count }
    }

    /// Arithmetic mean, or `None` when no reviews remain
    pub fn mean(&self) -> Option<f64> {
        if self.count <= 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }

    /// Aggregate after adding one score
    pub fn fold(self, score: Score) -> Self {
        Self {
            sum: self.sum + i64::from(score.value()),
            count: self.count + 1,
        }
    }

    /// Aggregate after removing one score
    pub fn unfold(self, score: Score) -> Self {
        if self.count <= 1 {
            return Self::default();
        }
        Self {
            sum: (self.sum - i64::from(score.value())).max(0),
            count: self.count - 1,
        }
    }

    /// Aggregate computed from scratch over a set of scores
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Score>,
    {
        scores.into_iter().fold(Self::default(), Self::fold)
    }
}

/// A restaurant
#[derive(Debug, Clone, Serialize)]
pub struct Venue {
    pub id: VenueId,
    pub owner: IdentityId,
    pub name: String,
    pub address: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
    pub ratings: RatingAggregate,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    /// Current average rating (`None` while the venue has no reviews)
    pub fn rating(&self) -> Option<f64> {
        self.ratings.mean()
    }

    pub fn is_owned_by(&self, identity: &IdentityId) -> bool {
        &self.owner == identity
    }
}

/// Data needed to register a venue
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub owner: IdentityId,
    pub name: String,
    pub address: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
}
