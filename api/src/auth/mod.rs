//! Caller authentication
//!
//! Identities are verified upstream; this layer only reads the trusted
//! identity headers and turns them into a typed `Identity`.

pub mod identity;

pub use identity::identity_middleware;
