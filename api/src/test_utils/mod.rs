//! Test utilities
//!
//! In-memory port implementations and test fixtures for unit testing.
//!
//! `InMemoryStore` implements every repository port over one set of maps, so
//! a single store can back all services and the axum router in tests.
//! Constraint behavior (unique slots, table foreign keys, aggregate updates)
//! mirrors the PostgreSQL schema.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
