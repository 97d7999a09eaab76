//! Common type definitions and the access-level lattice.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`UserId`]: account identifier
//! - [`PropertyId`]: property identifier
//! - [`UnitId`]: unit identifier
//! - [`NodeId`]: property-node identifier
//! - [`CollaboratorId`]: collaborator-row identifier
//!
//! [`AccessLevel`] is the single authorization currency of the application:
//! every property-scoped operation resolves the caller to one level and
//! compares it against the operation's requirement. The levels are totally
//! ordered, `None < Viewer < Editor < Owner`, so requirement checks are plain
//! `>=` comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type PropertyId = Uuid;
pub type UnitId = Uuid;
pub type NodeId = Uuid;
pub type CollaboratorId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// A caller's resolved access to one property.
///
/// Ownership implies full access; a collaborator row maps to its role; no
/// relation at all maps to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    None,
    Viewer,
    Editor,
    Owner,
}

impl AccessLevel {
    /// Read operations require any granted level.
    pub fn can_view(self) -> bool {
        self >= AccessLevel::Viewer
    }

    /// Write operations require editor or owner.
    pub fn can_edit(self) -> bool {
        self >= AccessLevel::Editor
    }

    /// Sharing, unsharing and lifecycle transitions require ownership.
    pub fn is_owner(self) -> bool {
        self == AccessLevel::Owner
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::None => write!(f, "NONE"),
            AccessLevel::Viewer => write!(f, "VIEWER"),
            AccessLevel::Editor => write!(f, "EDITOR"),
            AccessLevel::Owner => write!(f, "OWNER"),
        }
    }
}
