//! PostgreSQL adapter for TableRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::storage_error;
use crate::domain::entities::{NewTable, Table, VenueId};
use crate::domain::ports::TableRepository;
use crate::entity::{reservations, venue_tables};
use crate::error::DomainError;

/// PostgreSQL implementation of TableRepository
pub struct PostgresTableRepository {
    db: DatabaseConnection,
}

impl PostgresTableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TableRepository for PostgresTableRepository {
    async fn find(
        &self,
        venue_id: &VenueId,
        table_number: i32,
    ) -> Result<Option<Table>, DomainError> {
        let result = venue_tables::Entity::find()
            .filter(venue_tables::Column::VenueId.eq(venue_id.0))
            .filter(venue_tables::Column::TableNumber.eq(table_number))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_layout(
        &self,
        venue_id: &VenueId,
        layout: &str,
    ) -> Result<Vec<Table>, DomainError> {
        let results = venue_tables::Entity::find()
            .filter(venue_tables::Column::VenueId.eq(venue_id.0))
            .filter(venue_tables::Column::Layout.eq(layout))
            .order_by_asc(venue_tables::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_layouts(&self, venue_id: &VenueId) -> Result<Vec<String>, DomainError> {
        venue_tables::Entity::find()
            .select_only()
            .column(venue_tables::Column::Layout)
            .distinct()
            .filter(venue_tables::Column::VenueId.eq(venue_id.0))
            .order_by_asc(venue_tables::Column::Layout)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(storage_error)
    }

    async fn create(&self, table: &NewTable) -> Result<Table, DomainError> {
        let model = venue_tables::ActiveModel {
            id: Set(Uuid::new_v4()),
            venue_id: Set(table.venue_id.0),
            table_number: Set(table.table_number),
            layout: Set(table.layout.clone()),
            capacity: Set(table.capacity),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(|e| match storage_error(e) {
            DomainError::Conflict(_) => DomainError::Conflict(format!(
                "Table {} is already declared for venue {}",
                table.table_number, table.venue_id
            )),
            other => other,
        })?;

        Ok(result.into())
    }

    async fn remove(
        &self,
        venue_id: &VenueId,
        table_number: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        // Dropping the transaction without commit rolls it back.
        let txn = self.db.begin().await.map_err(storage_error)?;

        let upcoming = reservations::Entity::find()
            .filter(reservations::Column::VenueId.eq(venue_id.0))
            .filter(reservations::Column::TableNumber.eq(table_number))
            .filter(reservations::Column::RequestedTime.gt(now.fixed_offset()))
            .count(&txn)
            .await
            .map_err(storage_error)?;
        if upcoming > 0 {
            return Err(DomainError::Conflict(format!(
                "Table {} has {} upcoming reservation(s)",
                table_number, upcoming
            )));
        }

        reservations::Entity::delete_many()
            .filter(reservations::Column::VenueId.eq(venue_id.0))
            .filter(reservations::Column::TableNumber.eq(table_number))
            .filter(reservations::Column::RequestedTime.lte(now.fixed_offset()))
            .exec(&txn)
            .await
            .map_err(storage_error)?;

        // A booking that raced in after the count trips the RESTRICT foreign key.
        let result = venue_tables::Entity::delete_many()
            .filter(venue_tables::Column::VenueId.eq(venue_id.0))
            .filter(venue_tables::Column::TableNumber.eq(table_number))
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!(
                "Table {} not found in venue {}",
                table_number, venue_id
            )));
        }

        txn.commit().await.map_err(storage_error)?;
        Ok(())
    }
}
