//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Operations that touch more than one row (booking a slot, folding a review
//! into the venue aggregate, removing a table with its history) are single
//! port calls so each adapter can commit them atomically.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::calendar::DateRange;
use crate::domain::entities::{
    IdentityId, NewReservation, NewReview, NewTable, NewVenue, RatingAggregate, Reservation,
    ReservationId, Review, ReviewId, Table, Venue, VenueId,
};
use crate::error::DomainError;

/// Repository for Venue records
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Find a venue by ID
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, DomainError>;

    /// Register a new venue with an empty rating aggregate
    async fn create(&self, venue: &NewVenue) -> Result<Venue, DomainError>;
}

/// Repository for Table templates
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Find a table by its (venue, number) key
    async fn find(
        &self,
        venue_id: &VenueId,
        table_number: i32,
    ) -> Result<Option<Table>, DomainError>;

    /// Tables of one layout, ordered by table number
    async fn find_by_layout(
        &self,
        venue_id: &VenueId,
        layout: &str,
    ) -> Result<Vec<Table>, DomainError>;

    /// Distinct layout names declared for a venue, sorted
    async fn list_layouts(&self, venue_id: &VenueId) -> Result<Vec<String>, DomainError>;

    /// Declare a table. Fails with `Conflict` if the key is already declared.
    async fn create(&self, table: &NewTable) -> Result<Table, DomainError>;

    /// Remove a table template together with its reservations whose
    /// requested time is at or before `now`. Fails with `Conflict` if a
    /// reservation after `now` still references the table, `NotFound` if it
    /// is not declared.
    async fn remove(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}

/// Repository for Reservation rows
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find a reservation by ID
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError>;

    /// The live reservation holding a table on a date, if any
    async fn find_for_slot(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        date: NaiveDate,
    ) -> Result<Option<Reservation>, DomainError>;

    /// Reservations owned by an identity, ordered by requested time ascending
    async fn find_by_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Reservation>, DomainError>;

    /// Reservations of a venue, ordered by requested time ascending
    async fn find_by_venue(&self, venue_id: &VenueId) -> Result<Vec<Reservation>, DomainError>;

    /// Reservations of a venue whose slot date falls inside `range`
    async fn find_in_range(
        &self,
        venue_id: &VenueId,
        range: &DateRange,
    ) -> Result<Vec<Reservation>, DomainError>;

    /// Persist a reservation. Fails with `Conflict` if the slot is taken.
    async fn create(&self, reservation: &NewReservation) -> Result<Reservation, DomainError>;

    /// Delete a reservation. Returns false if it did not exist.
    async fn delete(&self, id: &ReservationId) -> Result<bool, DomainError>;
}

/// Repository for Review rows and the venue rating aggregate they feed
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Find a review by ID
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError>;

    /// Reviews of a venue, newest review timestamp first, then newest insert
    async fn find_by_venue(&self, venue_id: &VenueId) -> Result<Vec<Review>, DomainError>;

    /// Insert a review and fold its score into the venue aggregate in one
    /// atomic step. Returns the review and the aggregate after the insert.
    async fn create_and_fold(
        &self,
        review: &NewReview,
    ) -> Result<(Review, RatingAggregate), DomainError>;

    /// Delete a review and remove its score from the venue aggregate in one
    /// atomic step. Returns `None` if the review did not exist.
    async fn delete_and_unfold(
        &self,
        id: &ReviewId,
    ) -> Result<Option<(Review, RatingAggregate)>, DomainError>;

    /// Rebuild the venue aggregate from the stored review rows
    async fn recompute(&self, venue_id: &VenueId) -> Result<RatingAggregate, DomainError>;
}
