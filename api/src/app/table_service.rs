//! Table registry service
//!
//! Owners declare table templates per layout; guests browse them. Templates
//! carry no booking state.

use chrono::Utc;
use std::sync::Arc;

use super::access_policy::AccessPolicy;
use super::venue_service::load_venue;
use crate::domain::entities::{Identity, NewTable, Table, VenueId};
use crate::domain::ports::{TableRepository, VenueRepository};
use crate::error::DomainError;

pub struct TableService<VR, TR>
where
    VR: VenueRepository + ?Sized,
    TR: TableRepository + ?Sized,
{
    venues: Arc<VR>,
    tables: Arc<TR>,
}

impl<VR, TR> TableService<VR, TR>
where
    VR: VenueRepository + ?Sized,
    TR: TableRepository + ?Sized,
{
    pub fn new(venues: Arc<VR>, tables: Arc<TR>) -> Self {
        Self { venues, tables }
    }

    /// Declare a table template. Re-declaring an existing number is a conflict.
    pub async fn declare_table(
        &self,
        identity: &Identity,
        venue_id: &VenueId,
        table_number: i32,
        layout: &str,
        capacity: i32,
    ) -> Result<Table, DomainError> {
        let venue = load_venue(self.venues.as_ref(), venue_id).await?;
        AccessPolicy::require_venue_control(identity, &venue)?;

        let new_table = NewTable {
            venue_id: *venue_id,
            table_number,
            layout: layout.trim().to_string(),
            capacity,
        };
        new_table.validate()?;

        let table = self.tables.create(&new_table).await.inspect_err(|e| {
            if let DomainError::Conflict(_) = e {
                tracing::warn!(venue_id = %venue_id, table_number, "Table already declared");
            }
        })?;

        tracing::info!(
            venue_id = %venue_id,
            table_number,
            layout = %table.layout,
            capacity,
            "Table declared"
        );
        Ok(table)
    }

    /// Remove a table template.
    ///
    /// Fails with `Conflict` while the table has reservations still ahead;
    /// reservations whose time has passed are deleted along with the template.
    pub async fn remove_table(
        &self,
        identity: &Identity,
        venue_id: &VenueId,
        table_number: i32,
    ) -> Result<(), DomainError> {
        let venue = load_venue(self.venues.as_ref(), venue_id).await?;
        AccessPolicy::require_venue_control(identity, &venue)?;

        if self.tables.find(venue_id, table_number).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "Table {} not found in venue {}",
                table_number, venue_id
            )));
        }

        self.tables
            .remove(venue_id, table_number, Utc::now())
            .await
            .inspect_err(|e| {
                if let DomainError::Conflict(msg) = e {
                    tracing::warn!(
                        venue_id = %venue_id,
                        table_number,
                        reason = %msg,
                        "Table removal blocked"
                    );
                }
            })?;

        tracing::info!(venue_id = %venue_id, table_number, "Table removed");
        Ok(())
    }

    /// Tables of one layout, ordered by table number
    pub async fn list_tables(
        &self,
        venue_id: &VenueId,
        layout: &str,
    ) -> Result<Vec<Table>, DomainError> {
        load_venue(self.venues.as_ref(), venue_id).await?;
        self.tables.find_by_layout(venue_id, layout).await
    }

    pub async fn list_layouts(&self, venue_id: &VenueId) -> Result<Vec<String>, DomainError> {
        load_venue(self.venues.as_ref(), venue_id).await?;
        self.tables.list_layouts(venue_id).await
    }
}
