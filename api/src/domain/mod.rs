//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `ports`: Trait definitions for external dependencies
//! - `calendar`: Timestamp parsing and date-range helpers

pub mod calendar;
pub mod entities;
pub mod ports;
