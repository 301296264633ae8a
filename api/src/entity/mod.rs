//! SeaORM entities
//!
//! Row models for the PostgreSQL tables created by `migrations/0001_init.sql`.
//! Conversions into domain entities live next to each model.

pub mod reservations;
pub mod reviews;
pub mod venue_tables;
pub mod venues;
