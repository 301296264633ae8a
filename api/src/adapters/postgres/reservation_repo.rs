//! PostgreSQL adapter for ReservationRepository
//!
//! The unique index on (venue_id, table_number, slot_date) backs up the
//! in-process slot locks, so two writers can never both hold a slot even when
//! they run in different processes.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

use super::storage_error;
use crate::domain::calendar::DateRange;
use crate::domain::entities::{
    IdentityId, NewReservation, Reservation, ReservationId, VenueId,
};
use crate::domain::ports::ReservationRepository;
use crate::entity::reservations;
use crate::error::DomainError;

/// PostgreSQL implementation of ReservationRepository
pub struct PostgresReservationRepository {
    db: DatabaseConnection,
}

impl PostgresReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        let result = reservations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_for_slot(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        date: NaiveDate,
    ) -> Result<Option<Reservation>, DomainError> {
        let result = reservations::Entity::find()
            .filter(reservations::Column::VenueId.eq(venue_id.0))
            .filter(reservations::Column::TableNumber.eq(table_number))
            .filter(reservations::Column::SlotDate.eq(date))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Reservation>, DomainError> {
        let results = reservations::Entity::find()
            .filter(reservations::Column::Identity.eq(identity.0.as_str()))
            .order_by_asc(reservations::Column::RequestedTime)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_venue(&self, venue_id: &VenueId) -> Result<Vec<Reservation>, DomainError> {
        let results = reservations::Entity::find()
            .filter(reservations::Column::VenueId.eq(venue_id.0))
            .order_by_asc(reservations::Column::RequestedTime)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_in_range(
        &self,
        venue_id: &VenueId,
        range: &DateRange,
    ) -> Result<Vec<Reservation>, DomainError> {
        let results = reservations::Entity::find()
            .filter(reservations::Column::VenueId.eq(venue_id.0))
            .filter(reservations::Column::SlotDate.between(range.from(), range.to()))
            .order_by_asc(reservations::Column::SlotDate)
            .order_by_asc(reservations::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, reservation: &NewReservation) -> Result<Reservation, DomainError> {
        let slot = reservation.slot();
        let model = reservations::ActiveModel {
            id: Set(Uuid::new_v4()),
            venue_id: Set(reservation.venue_id.0),
            table_number: Set(reservation.table_number),
            capacity: Set(reservation.capacity),
            layout: Set(reservation.layout.clone()),
            identity: Set(reservation.identity.0.clone()),
            requested_time: Set(reservation.requested_time),
            slot_date: Set(slot.date),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(format!(
                "Table {} is already booked on {}",
                slot.table_number, slot.date
            )),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => DomainError::NotFound(format!(
                "Table {} not found in venue {}",
                slot.table_number, slot.venue_id
            )),
            _ => storage_error(e),
        })?;

        Ok(result.into())
    }

    async fn delete(&self, id: &ReservationId) -> Result<bool, DomainError> {
        let result = reservations::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected > 0)
    }
}
