//! Reservation domain entity
//!
//! A reservation is one guest's claim on a table for a calendar date. Rows are
//! created by booking and deleted by cancellation; they are never updated.
//! Conflicts are detected at date granularity: a table holds at most one live
//! reservation per calendar date regardless of time of day.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityId;
use super::venue::VenueId;
use crate::domain::calendar;

/// Unique identifier for a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub Uuid);

impl ReservationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ReservationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The unit of contention for bookings: one table on one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub venue_id: VenueId,
    pub table_number: i32,
    pub date: NaiveDate,
}

impl SlotKey {
    pub fn new(venue_id: VenueId, table_number: i32, date: NaiveDate) -> Self {
        Self {
            venue_id,
            table_number,
            date,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.venue_id, self.table_number, self.date)
    }
}

/// A live booking
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub venue_id: VenueId,
    pub table_number: i32,
    /// Table capacity at booking time
    pub capacity: i32,
    pub layout: String,
    pub identity: IdentityId,
    pub requested_time: DateTime<FixedOffset>,
    /// Calendar date of `requested_time` as written by the guest
    pub slot_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.venue_id, self.table_number, self.slot_date)
    }

    pub fn is_owned_by(&self, identity: &IdentityId) -> bool {
        &self.identity == identity
    }
}

/// Data needed to create a reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub venue_id: VenueId,
    pub table_number: i32,
    pub capacity: i32,
    pub layout: String,
    pub identity: IdentityId,
    pub requested_time: DateTime<FixedOffset>,
}

impl NewReservation {
    pub fn slot_date(&self) -> NaiveDate {
        calendar::slot_date(&self.requested_time)
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.venue_id, self.table_number, self.slot_date())
    }
}

/// Derived occupancy of a table on a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Booked,
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotStatus::Free => write!(f, "free"),
            SlotStatus::Booked => write!(f, "booked"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub status: SlotStatus,
}

/// Per-date availability of one declared table
#[derive(Debug, Clone, Serialize)]
pub struct TableAvailability {
    pub table_number: i32,
    pub capacity: i32,
    pub layout: String,
    pub days: Vec<DayAvailability>,
}

impl TableAvailability {
    #[cfg(test)]
    pub fn status_on(&self, date: NaiveDate) -> Option<SlotStatus> {
        self.days.iter().find(|d| d.date == date).map(|d| d.status)
    }
}
