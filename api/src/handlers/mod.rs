//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

mod extract;
pub mod reservations;
pub mod reviews;
pub mod tables;
pub mod venues;

pub use reservations::{cancel, list_my_reservations, list_venue_reservations, reserve};
pub use reviews::{delete_review, list_reviews, recompute_rating, submit_review};
pub use tables::{check_availability, declare_table, list_layouts, list_tables, remove_table};
pub use venues::{get_venue, register_venue};
