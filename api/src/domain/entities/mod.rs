//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod identity;
pub mod reservation;
pub mod review;
pub mod table;
pub mod venue;

pub use identity::{Identity, IdentityId, Role};
pub use reservation::{
    DayAvailability, NewReservation, Reservation, ReservationId, SlotKey, SlotStatus,
    TableAvailability,
};
pub use review::{NewReview, Review, ReviewId, Score};
pub use table::{NewTable, Table};
pub use venue::{NewVenue, RatingAggregate, Venue, VenueId};
