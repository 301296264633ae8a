//! In-memory implementations of port traits
//!
//! These store data in memory and allow tests to verify behavior.
//! Locks are always taken in the order venues, tables, reservations, reviews.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use crate::domain::calendar::DateRange;
use crate::domain::entities::{
    IdentityId, NewReservation, NewReview, NewTable, NewVenue, RatingAggregate, Reservation,
    ReservationId, Review, ReviewId, Table, Venue, VenueId,
};
use crate::domain::ports::{
    ReservationRepository, ReviewRepository, TableRepository, VenueRepository,
};
use crate::error::DomainError;

#[derive(Default)]
pub struct InMemoryStore {
    venues: RwLock<HashMap<VenueId, Venue>>,
    tables: RwLock<BTreeMap<(VenueId, i32), Table>>,
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
    reviews: RwLock<HashMap<ReviewId, Review>>,
    unavailable: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the database were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Pre-populate with a venue for testing
    pub fn with_venue(self, venue: Venue) -> Self {
        self.venues.write().unwrap().insert(venue.id, venue);
        self
    }

    /// Pre-populate with a table for testing
    pub fn with_table(self, table: Table) -> Self {
        self.tables
            .write()
            .unwrap()
            .insert((table.venue_id, table.table_number), table);
        self
    }

    /// Pre-populate with a reservation, bypassing the future-time rule
    pub fn with_reservation(self, reservation: Reservation) -> Self {
        self.reservations
            .write()
            .unwrap()
            .insert(reservation.id, reservation);
        self
    }

    pub fn reservation_count(&self) -> usize {
        self.reservations.read().unwrap().len()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.read().unwrap().len()
    }

    /// Overwrite a venue's stored aggregate, simulating drift
    pub fn corrupt_aggregate(&self, venue_id: &VenueId, ratings: RatingAggregate) {
        if let Some(venue) = self.venues.write().unwrap().get_mut(venue_id) {
            venue.ratings = ratings;
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable {
            Err(DomainError::Unavailable(
                "in-memory store is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

fn sorted_by_time(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
    reservations.sort_by_key(|r| (r.requested_time, r.table_number));
    reservations
}

#[async_trait]
impl VenueRepository for InMemoryStore {
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, DomainError> {
        self.check()?;
        Ok(self.venues.read().unwrap().get(id).cloned())
    }

    async fn create(&self, venue: &NewVenue) -> Result<Venue, DomainError> {
        self.check()?;
        let created = Venue {
            id: VenueId::new(),
            owner: venue.owner.clone(),
            name: venue.name.clone(),
            address: venue.address.clone(),
            cuisine: venue.cuisine.clone(),
            description: venue.description.clone(),
            ratings: RatingAggregate::default(),
            created_at: Utc::now(),
        };
        self.venues
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl TableRepository for InMemoryStore {
    async fn find(
        &self,
        venue_id: &VenueId,
        table_number: i32,
    ) -> Result<Option<Table>, DomainError> {
        self.check()?;
        Ok(self
            .tables
            .read()
            .unwrap()
            .get(&(*venue_id, table_number))
            .cloned())
    }

    async fn find_by_layout(
        &self,
        venue_id: &VenueId,
        layout: &str,
    ) -> Result<Vec<Table>, DomainError> {
        self.check()?;
        Ok(self
            .tables
            .read()
            .unwrap()
            .values()
            .filter(|t| &t.venue_id == venue_id && t.layout == layout)
            .cloned()
            .collect())
    }

    async fn list_layouts(&self, venue_id: &VenueId) -> Result<Vec<String>, DomainError> {
        self.check()?;
        let layouts: BTreeSet<String> = self
            .tables
            .read()
            .unwrap()
            .values()
            .filter(|t| &t.venue_id == venue_id)
            .map(|t| t.layout.clone())
            .collect();
        Ok(layouts.into_iter().collect())
    }

    async fn create(&self, table: &NewTable) -> Result<Table, DomainError> {
        self.check()?;
        let mut tables = self.tables.write().unwrap();
        let key = (table.venue_id, table.table_number);
        if tables.contains_key(&key) {
            return Err(DomainError::Conflict(format!(
                "Table {} is already declared for venue {}",
                table.table_number, table.venue_id
            )));
        }
        let created = Table {
            venue_id: table.venue_id,
            table_number: table.table_number,
            layout: table.layout.clone(),
            capacity: table.capacity,
            created_at: Utc::now(),
        };
        tables.insert(key, created.clone());
        Ok(created)
    }

    async fn remove(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.check()?;
        let mut tables = self.tables.write().unwrap();
        let mut reservations = self.reservations.write().unwrap();

        let on_table = |r: &Reservation| &r.venue_id == venue_id && r.table_number == table_number;
        let upcoming = reservations
            .values()
            .filter(|r| on_table(r) && r.requested_time.with_timezone(&Utc) > now)
            .count();
        if upcoming > 0 {
            return Err(DomainError::Conflict(format!(
                "Table {} has {} upcoming reservation(s)",
                table_number, upcoming
            )));
        }
        if tables.remove(&(*venue_id, table_number)).is_none() {
            return Err(DomainError::NotFound(format!(
                "Table {} not found in venue {}",
                table_number, venue_id
            )));
        }
        reservations.retain(|_, r| !on_table(r));
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        self.check()?;
        Ok(self.reservations.read().unwrap().get(id).cloned())
    }

    async fn find_for_slot(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        date: NaiveDate,
    ) -> Result<Option<Reservation>, DomainError> {
        self.check()?;
        Ok(self
            .reservations
            .read()
            .unwrap()
            .values()
            .find(|r| {
                &r.venue_id == venue_id && r.table_number == table_number && r.slot_date == date
            })
            .cloned())
    }

    async fn find_by_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Reservation>, DomainError> {
        self.check()?;
        let found = self
            .reservations
            .read()
            .unwrap()
            .values()
            .filter(|r| &r.identity == identity)
            .cloned()
            .collect();
        Ok(sorted_by_time(found))
    }

    async fn find_by_venue(&self, venue_id: &VenueId) -> Result<Vec<Reservation>, DomainError> {
        self.check()?;
        let found = self
            .reservations
            .read()
            .unwrap()
            .values()
            .filter(|r| &r.venue_id == venue_id)
            .cloned()
            .collect();
        Ok(sorted_by_time(found))
    }

    async fn find_in_range(
        &self,
        venue_id: &VenueId,
        range: &DateRange,
    ) -> Result<Vec<Reservation>, DomainError> {
        self.check()?;
        let mut found: Vec<_> = self
            .reservations
            .read()
            .unwrap()
            .values()
            .filter(|r| &r.venue_id == venue_id && range.contains(r.slot_date))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.slot_date, r.table_number));
        Ok(found)
    }

    async fn create(&self, reservation: &NewReservation) -> Result<Reservation, DomainError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        let mut reservations = self.reservations.write().unwrap();
        let slot = reservation.slot();

        if !tables.contains_key(&(slot.venue_id, slot.table_number)) {
            return Err(DomainError::NotFound(format!(
                "Table {} not found in venue {}",
                slot.table_number, slot.venue_id
            )));
        }
        if reservations.values().any(|r| r.slot() == slot) {
            return Err(DomainError::Conflict(format!(
                "Table {} is already booked on {}",
                slot.table_number, slot.date
            )));
        }

        let created = Reservation {
            id: ReservationId::new(),
            venue_id: reservation.venue_id,
            table_number: reservation.table_number,
            capacity: reservation.capacity,
            layout: reservation.layout.clone(),
            identity: reservation.identity.clone(),
            requested_time: reservation.requested_time,
            slot_date: slot.date,
            created_at: Utc::now(),
        };
        reservations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &ReservationId) -> Result<bool, DomainError> {
        self.check()?;
        Ok(self.reservations.write().unwrap().remove(id).is_some())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        self.check()?;
        Ok(self.reviews.read().unwrap().get(id).cloned())
    }

    async fn find_by_venue(&self, venue_id: &VenueId) -> Result<Vec<Review>, DomainError> {
        self.check()?;
        let mut found: Vec<_> = self
            .reviews
            .read()
            .unwrap()
            .values()
            .filter(|r| &r.venue_id == venue_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(found)
    }

    async fn create_and_fold(
        &self,
        review: &NewReview,
    ) -> Result<(Review, RatingAggregate), DomainError> {
        self.check()?;
        let mut venues = self.venues.write().unwrap();
        let mut reviews = self.reviews.write().unwrap();

        let venue = venues
            .get_mut(&review.venue_id)
            .ok_or_else(|| DomainError::NotFound(format!("Venue {} not found", review.venue_id)))?;

        let created = Review {
            id: ReviewId::new(),
            venue_id: review.venue_id,
            identity: review.identity.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            timestamp: review.timestamp,
            created_at: Utc::now(),
        };
        venue.ratings = venue.ratings.fold(review.rating);
        reviews.insert(created.id, created.clone());
        Ok((created, venue.ratings))
    }

    async fn delete_and_unfold(
        &self,
        id: &ReviewId,
    ) -> Result<Option<(Review, RatingAggregate)>, DomainError> {
        self.check()?;
        let mut venues = self.venues.write().unwrap();
        let mut reviews = self.reviews.write().unwrap();

        let Some(review) = reviews.get(id).cloned() else {
            return Ok(None);
        };
        let venue = venues
            .get_mut(&review.venue_id)
            .ok_or_else(|| DomainError::NotFound(format!("Venue {} not found", review.venue_id)))?;
        reviews.remove(id);
        venue.ratings = venue.ratings.unfold(review.rating);
        let ratings = venue.ratings;
        Ok(Some((review, ratings)))
    }

    async fn recompute(&self, venue_id: &VenueId) -> Result<RatingAggregate, DomainError> {
        self.check()?;
        let mut venues = self.venues.write().unwrap();
        let reviews = self.reviews.read().unwrap();

        let venue = venues
            .get_mut(venue_id)
            .ok_or_else(|| DomainError::NotFound(format!("Venue {} not found", venue_id)))?;
        venue.ratings = RatingAggregate::from_scores(
            reviews
                .values()
                .filter(|r| &r.venue_id == venue_id)
                .map(|r| r.rating),
        );
        Ok(venue.ratings)
    }
}
