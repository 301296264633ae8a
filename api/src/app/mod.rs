//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod access_policy;
pub mod rating_service;
pub mod reservation_service;
pub mod slot_locks;
pub mod table_service;
pub mod venue_service;

pub use rating_service::{RatingService, RatingUpdate};
pub use reservation_service::ReservationService;
pub use table_service::TableService;
pub use venue_service::VenueService;
