//! Review domain entity
//!
//! Reviews feed the venue rating aggregate. A review is created once and can
//! only be removed by the identity that wrote it.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityId;
use super::venue::VenueId;
use crate::error::DomainError;

/// Unique identifier for a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ReviewId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowest accepted review score
pub const MIN_SCORE: i32 = 1;
/// Highest accepted review score
pub const MAX_SCORE: i32 = 5;

/// A review score, always within `MIN_SCORE..=MAX_SCORE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(DomainError::InvalidArgument(format!(
                "rating must be between {} and {}, got {}",
                MIN_SCORE, MAX_SCORE, value
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> i32 {
        i32::from(self.0)
    }
}

/// A guest review of a venue
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub venue_id: VenueId,
    pub identity: IdentityId,
    pub rating: Score,
    pub comment: String,
    /// Client-supplied review time
    pub timestamp: DateTime<FixedOffset>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn is_owned_by(&self, identity: &IdentityId) -> bool {
        &self.identity == identity
    }
}

/// Data needed to create a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub venue_id: VenueId,
    pub identity: IdentityId,
    pub rating: Score,
    pub comment: String,
    pub timestamp: DateTime<FixedOffset>,
}
