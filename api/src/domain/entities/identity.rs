//! Caller identity domain entity
//!
//! Identities are issued by the external identity provider. The core trusts
//! the identifier and role it receives and never stores credentials.

use serde::{Deserialize, Serialize};

/// Opaque subject identifier issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub String);

impl From<&str> for IdentityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for IdentityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role claim carried by an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    VenueOwner,
    Administrator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Guest => write!(f, "guest"),
            Role::VenueOwner => write!(f, "venue_owner"),
            Role::Administrator => write!(f, "administrator"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guest" | "user" => Ok(Role::Guest),
            "venue_owner" | "owner" | "restaurant" => Ok(Role::VenueOwner),
            "administrator" | "admin" => Ok(Role::Administrator),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<IdentityId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Whether this identity may register and manage venues at all
    pub fn can_manage_venues(&self) -> bool {
        matches!(self.role, Role::VenueOwner | Role::Administrator)
    }
}
