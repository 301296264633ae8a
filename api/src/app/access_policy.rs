//! Venue control checks
//!
//! An identity controls a venue when it is an administrator, or a venue owner
//! whose identifier matches the venue's owner.

use crate::domain::entities::{Identity, Role, Venue};
use crate::error::DomainError;

pub struct AccessPolicy;

impl AccessPolicy {
    pub fn authorize(identity: &Identity, venue: &Venue) -> bool {
        match identity.role {
            Role::Administrator => true,
            Role::VenueOwner => venue.is_owned_by(&identity.id),
            Role::Guest => false,
        }
    }

    pub fn require_venue_control(identity: &Identity, venue: &Venue) -> Result<(), DomainError> {
        if Self::authorize(identity, venue) {
            Ok(())
        } else {
            tracing::warn!(
                identity = %identity.id,
                role = %identity.role,
                venue_id = %venue.id,
                "Venue control denied"
            );
            Err(DomainError::PermissionDenied(format!(
                "{} does not control venue {}",
                identity.id, venue.id
            )))
        }
    }

    pub fn require_administrator(identity: &Identity) -> Result<(), DomainError> {
        if identity.is_administrator() {
            Ok(())
        } else {
            tracing::warn!(
                identity = %identity.id,
                role = %identity.role,
                "Administrator required"
            );
            Err(DomainError::PermissionDenied(
                "Administrator role required".to_string(),
            ))
        }
    }
}
