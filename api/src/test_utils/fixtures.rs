//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    Identity, IdentityId, RatingAggregate, Reservation, ReservationId, Role, Table, Venue, VenueId,
};

/// A guest identity with the given id
pub fn guest(id: &str) -> Identity {
    Identity::new(id, Role::Guest)
}

/// A venue owner identity with the given id
pub fn owner(id: &str) -> Identity {
    Identity::new(id, Role::VenueOwner)
}

pub fn admin() -> Identity {
    Identity::new("admin@tablebook.test", Role::Administrator)
}

/// Create a test venue owned by `owner`, with no reviews
pub fn test_venue(owner: &Identity) -> Venue {
    Venue {
        id: VenueId(Uuid::new_v4()),
        owner: owner.id.clone(),
        name: "Test Bistro".to_string(),
        address: Some("1 Test Street".to_string()),
        cuisine: Some("Italian".to_string()),
        description: None,
        ratings: RatingAggregate::default(),
        created_at: Utc::now(),
    }
}

/// Create a table in layout "Main"
pub fn test_table(venue_id: VenueId, table_number: i32, capacity: i32) -> Table {
    test_table_in(venue_id, table_number, capacity, "Main")
}

pub fn test_table_in(venue_id: VenueId, table_number: i32, capacity: i32, layout: &str) -> Table {
    Table {
        venue_id,
        table_number,
        layout: layout.to_string(),
        capacity,
        created_at: Utc::now(),
    }
}

/// A stored reservation for a table on `date` at 19:00 UTC, owned by `identity`
pub fn test_reservation(table: &Table, identity: &IdentityId, date: NaiveDate) -> Reservation {
    let requested_time = date
        .and_hms_opt(19, 0, 0)
        .map(|t| t.and_utc().fixed_offset())
        .unwrap();
    test_reservation_at(table, identity, requested_time)
}

/// A stored reservation at an exact time; the slot date is the date as written
pub fn test_reservation_at(
    table: &Table,
    identity: &IdentityId,
    requested_time: DateTime<FixedOffset>,
) -> Reservation {
    Reservation {
        id: ReservationId::new(),
        venue_id: table.venue_id,
        table_number: table.table_number,
        capacity: table.capacity,
        layout: table.layout.clone(),
        identity: identity.clone(),
        requested_time,
        slot_date: requested_time.date_naive(),
        created_at: Utc::now(),
    }
}

/// RFC 3339 timestamp `days` days from now
pub fn days_from_now(days: i64) -> String {
    rfc3339(Utc::now() + Duration::days(days))
}

pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar date `days` days from today (UTC)
pub fn date_from_today(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}
