//! Database models for property collaborators.

use crate::api::models::collaborators::CollaboratorRole;
use crate::types::{CollaboratorId, PropertyId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a collaborator row (sharing a property)
#[derive(Debug, Clone)]
pub struct CollaboratorCreateDBRequest {
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub role: CollaboratorRole,
    pub invited_by: UserId,
}

/// Database response for a collaborator, joined with the user's identity
/// for display.
#[derive(Debug, Clone)]
pub struct CollaboratorDBResponse {
    pub id: CollaboratorId,
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub role: CollaboratorRole,
    pub invited_by: UserId,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}
