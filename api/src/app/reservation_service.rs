//! Reservation ledger service
//!
//! Books and cancels tables at calendar-date granularity and answers
//! availability queries. Each (venue, table, date) slot moves FREE -> BOOKED
//! on `reserve` and back on `cancel`; occupancy is always derived from the
//! stored reservations.

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use super::access_policy::AccessPolicy;
use super::slot_locks::SlotLocks;
use super::venue_service::load_venue;
use crate::config::DEFAULT_MAX_AVAILABILITY_DAYS;
use crate::domain::calendar::{self, DateRange};
use crate::domain::entities::{
    DayAvailability, Identity, NewReservation, Reservation, ReservationId, SlotStatus,
    TableAvailability, VenueId,
};
use crate::domain::ports::{ReservationRepository, TableRepository, VenueRepository};
use crate::error::DomainError;

pub struct ReservationService<VR, TR, RR>
where
    VR: VenueRepository + ?Sized,
    TR: TableRepository + ?Sized,
    RR: ReservationRepository + ?Sized,
{
    venues: Arc<VR>,
    tables: Arc<TR>,
    reservations: Arc<RR>,
    locks: SlotLocks,
    max_availability_days: u32,
}

impl<VR, TR, RR> ReservationService<VR, TR, RR>
where
    VR: VenueRepository + ?Sized,
    TR: TableRepository + ?Sized,
    RR: ReservationRepository + ?Sized,
{
    pub fn new(venues: Arc<VR>, tables: Arc<TR>, reservations: Arc<RR>) -> Self {
        Self {
            venues,
            tables,
            reservations,
            locks: SlotLocks::new(),
            max_availability_days: DEFAULT_MAX_AVAILABILITY_DAYS,
        }
    }

    /// Limit the span of availability queries
    pub fn with_max_availability_days(mut self, days: u32) -> Self {
        self.max_availability_days = days;
        self
    }

    /// Book a table for the calendar date of `requested_time`.
    ///
    /// The duplicate check and the insert run while holding the slot lock, so
    /// concurrent bookings for one slot yield exactly one success. The store's
    /// unique index rejects anything that slips past another process's lock.
    pub async fn reserve(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        identity: &Identity,
        requested_time: &str,
    ) -> Result<Reservation, DomainError> {
        let table = self
            .tables
            .find(venue_id, table_number)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Table {} not found in venue {}",
                    table_number, venue_id
                ))
            })?;

        let requested_time = calendar::parse_timestamp(requested_time)?;
        calendar::ensure_future(&requested_time, Utc::now())?;

        let new_reservation = NewReservation {
            venue_id: *venue_id,
            table_number,
            capacity: table.capacity,
            layout: table.layout,
            identity: identity.id.clone(),
            requested_time,
        };
        let slot = new_reservation.slot();

        let _guard = self.locks.acquire(slot).await;

        if let Some(existing) = self
            .reservations
            .find_for_slot(venue_id, table_number, slot.date)
            .await?
        {
            tracing::warn!(
                slot = %slot,
                identity = %identity.id,
                held_by = %existing.id,
                "Slot already booked"
            );
            return Err(DomainError::Conflict(format!(
                "Table {} is already booked on {}",
                table_number, slot.date
            )));
        }

        let reservation = self
            .reservations
            .create(&new_reservation)
            .await
            .inspect_err(|e| {
                if let DomainError::Conflict(_) = e {
                    tracing::warn!(
                        slot = %slot,
                        identity = %identity.id,
                        "Slot taken by a concurrent writer"
                    );
                }
            })?;

        tracing::info!(
            reservation_id = %reservation.id,
            slot = %slot,
            identity = %identity.id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Cancel a reservation. Allowed for its owner and for whoever controls
    /// the venue.
    pub async fn cancel(
        &self,
        reservation_id: &ReservationId,
        identity: &Identity,
    ) -> Result<(), DomainError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Reservation {} not found", reservation_id))
            })?;

        if !reservation.is_owned_by(&identity.id) {
            let venue = load_venue(self.venues.as_ref(), &reservation.venue_id).await?;
            AccessPolicy::require_venue_control(identity, &venue)?;
        }

        if !self.reservations.delete(reservation_id).await? {
            return Err(DomainError::NotFound(format!(
                "Reservation {} not found",
                reservation_id
            )));
        }

        tracing::info!(
            reservation_id = %reservation_id,
            slot = %reservation.slot(),
            cancelled_by = %identity.id,
            "Reservation cancelled"
        );
        Ok(())
    }

    /// The caller's reservations, earliest first
    pub async fn list_for_identity(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Reservation>, DomainError> {
        self.reservations.find_by_identity(&identity.id).await
    }

    /// All reservations of a venue, earliest first. Venue controllers only.
    pub async fn list_for_venue(
        &self,
        venue_id: &VenueId,
        identity: &Identity,
    ) -> Result<Vec<Reservation>, DomainError> {
        let venue = load_venue(self.venues.as_ref(), venue_id).await?;
        AccessPolicy::require_venue_control(identity, &venue)?;
        self.reservations.find_by_venue(venue_id).await
    }

    /// Per-date status of every table in a layout over an inclusive range
    pub async fn check_availability(
        &self,
        venue_id: &VenueId,
        layout: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TableAvailability>, DomainError> {
        load_venue(self.venues.as_ref(), venue_id).await?;
        let range = DateRange::new(from, to, self.max_availability_days)?;

        let tables = self.tables.find_by_layout(venue_id, layout).await?;
        let booked: HashSet<(i32, NaiveDate)> = self
            .reservations
            .find_in_range(venue_id, &range)
            .await?
            .into_iter()
            .map(|r| (r.table_number, r.slot_date))
            .collect();

        Ok(tables
            .into_iter()
            .map(|table| {
                let days = range
                    .days()
                    .map(|date| DayAvailability {
                        date,
                        status: if booked.contains(&(table.table_number, date)) {
                            SlotStatus::Booked
                        } else {
                            SlotStatus::Free
                        },
                    })
                    .collect();
                TableAvailability {
                    table_number: table.table_number,
                    capacity: table.capacity,
                    layout: table.layout,
                    days,
                }
            })
            .collect())
    }
}
