//! API-facing collaborator (property sharing) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::collaborators::CollaboratorDBResponse;
use crate::types::{AccessLevel, CollaboratorId, PropertyId, UserId};

/// Role granted to a collaborator on a shared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "collaborator_role", rename_all = "lowercase")]
pub enum CollaboratorRole {
    Editor,
    Viewer,
}

impl From<CollaboratorRole> for AccessLevel {
    fn from(role: CollaboratorRole) -> Self {
        match role {
            CollaboratorRole::Editor => AccessLevel::Editor,
            CollaboratorRole::Viewer => AccessLevel::Viewer,
        }
    }
}

/// Request body for sharing a property with another user, addressed by email.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CollaboratorCreate {
    pub email: String,
    pub role: CollaboratorRole,
}

/// Request body for changing a collaborator's role.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CollaboratorUpdate {
    pub role: CollaboratorRole,
}

/// A collaborator entry as returned by the API, joined with the user's
/// display details.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollaboratorResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CollaboratorId,
    #[schema(value_type = String, format = "uuid")]
    pub property_id: PropertyId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub role: CollaboratorRole,
    #[schema(value_type = String, format = "uuid")]
    pub invited_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<CollaboratorDBResponse> for CollaboratorResponse {
    fn from(db: CollaboratorDBResponse) -> Self {
        Self {
            id: db.id,
            property_id: db.property_id,
            user_id: db.user_id,
            user_name: db.user_name,
            user_email: db.user_email,
            role: db.role,
            invited_by: db.invited_by,
            created_at: db.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_to_access_level() {
        assert_eq!(
            AccessLevel::from(CollaboratorRole::Editor),
            AccessLevel::Editor
        );
        assert_eq!(
            AccessLevel::from(CollaboratorRole::Viewer),
            AccessLevel::Viewer
        );
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&CollaboratorRole::Viewer).unwrap(),
            "\"VIEWER\""
        );
    }
}
