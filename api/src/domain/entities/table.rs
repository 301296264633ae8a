//! Table template entity
//!
//! A table is a declarative seating unit within a named layout of a venue.
//! It carries no booking state; occupancy is derived from reservations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::venue::VenueId;
use crate::error::DomainError;

/// A declared table, keyed by (venue_id, table_number)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub venue_id: VenueId,
    pub table_number: i32,
    pub layout: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

/// Data needed to declare a table
#[derive(Debug, Clone)]
pub struct NewTable {
    pub venue_id: VenueId,
    pub table_number: i32,
    pub layout: String,
    pub capacity: i32,
}

impl NewTable {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.table_number <= 0 {
            return Err(DomainError::InvalidArgument(format!(
                "table_number must be positive, got {}",
                self.table_number
            )));
        }
        if self.capacity <= 0 {
            return Err(DomainError::InvalidArgument(format!(
                "capacity must be positive, got {}",
                self.capacity
            )));
        }
        if self.layout.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "layout name is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_table(table_number: i32, capacity: i32, layout: &str) -> NewTable {
        NewTable {
            venue_id: VenueId::new(),
            table_number,
            layout: layout.to_string(),
            capacity,
        }
    }

    #[test]
    fn valid_table_passes() {
        assert!(new_table(5, 4, "Main").validate().is_ok());
    }

    #[test]
    fn non_positive_number_is_rejected() {
        assert!(matches!(
            new_table(0, 4, "Main").validate(),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            new_table(-3, 4, "Main").validate(),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_positive_capacity_is_rejected() {
        assert!(matches!(
            new_table(1, 0, "Main").validate(),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn blank_layout_is_rejected() {
        assert!(matches!(
            new_table(1, 2, "   ").validate(),
            Err(DomainError::InvalidArgument(_))
        ));
    }
}
