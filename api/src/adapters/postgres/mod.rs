//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod reservation_repo;
pub mod review_repo;
pub mod schema;
pub mod table_repo;
pub mod venue_repo;


use sea_orm::{DbErr, SqlErr};

use crate::error::DomainError;

pub use reservation_repo::PostgresReservationRepository;
pub use review_repo::PostgresReviewRepository;
pub use schema::apply_schema;
pub use table_repo::PostgresTableRepository;
pub use venue_repo::PostgresVenueRepository;

/// Map a SeaORM error onto the domain error kinds.
///
/// Constraint violations are rule breaches and surface as `Conflict`;
/// everything else means the store could not serve the request.
pub(crate) fn storage_error(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Conflict(msg),
        _ => DomainError::Unavailable(e.to_string()),
    }
}
