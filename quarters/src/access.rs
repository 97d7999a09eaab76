//! Access control resolver.
//!
//! Every property-scoped request resolves the caller's effective
//! [`AccessLevel`] before touching anything: `Owner` if the caller owns the
//! property, otherwise the collaborator role if one exists, otherwise `None`.
//! Writes need at least `Editor`, reads at least `Viewer`, and sharing or
//! lifecycle changes need `Owner`.

use sqlx::PgConnection;
use tracing::instrument;

use crate::api::models::collaborators::CollaboratorRole;
use crate::db::handlers::{Collaborators, Properties, Repository};
use crate::db::models::properties::PropertyDBResponse;
use crate::errors::{Error, Result};
use crate::types::{AccessLevel, PropertyId, UserId, abbrev_uuid};

/// Pure mapping from ownership + optional collaborator role to a level.
pub fn level_from(owner_id: UserId, user_id: UserId, role: Option<CollaboratorRole>) -> AccessLevel {
    if owner_id == user_id {
        return AccessLevel::Owner;
    }
    match role {
        Some(r) => r.into(),
        None => AccessLevel::None,
    }
}

/// Resolve the caller's access level on a property.
///
/// Returns `NotFound` when the property does not exist. The property row is
/// returned alongside the level so callers don't fetch it twice.
#[instrument(skip(conn), fields(property_id = %abbrev_uuid(&property_id), user_id = %abbrev_uuid(&user_id)))]
pub async fn resolve_access(
    conn: &mut PgConnection,
    property_id: PropertyId,
    user_id: UserId,
) -> Result<(PropertyDBResponse, AccessLevel)> {
    let property = Properties::new(&mut *conn)
        .get_by_id(property_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Property".to_string(),
            id: property_id.to_string(),
        })?;

    if property.owner_id == user_id {
        return Ok((property, AccessLevel::Owner));
    }

    let role = Collaborators::new(&mut *conn).get_role(property_id, user_id).await?;
    let level = level_from(property.owner_id, user_id, role);

    Ok((property, level))
}

/// Resolve access and require at least view rights.
///
/// A caller with no relationship to the property gets `NotFound` rather than
/// `AccessDenied`, so property ids are not probeable.
pub async fn require_view(
    conn: &mut PgConnection,
    property_id: PropertyId,
    user_id: UserId,
) -> Result<(PropertyDBResponse, AccessLevel)> {
    let (property, level) = resolve_access(conn, property_id, user_id).await?;
    if !level.can_view() {
        return Err(Error::NotFound {
            resource: "Property".to_string(),
            id: property_id.to_string(),
        });
    }
    Ok((property, level))
}

/// Resolve access and require at least edit rights.
pub async fn require_edit(
    conn: &mut PgConnection,
    property_id: PropertyId,
    user_id: UserId,
    action: &str,
) -> Result<(PropertyDBResponse, AccessLevel)> {
    let (property, level) = require_view(conn, property_id, user_id).await?;
    if !level.can_edit() {
        return Err(Error::AccessDenied {
            required: AccessLevel::Editor,
            action: action.to_string(),
            resource: format!("property {property_id}"),
        });
    }
    Ok((property, level))
}

/// Resolve access and require ownership.
pub async fn require_owner(
    conn: &mut PgConnection,
    property_id: PropertyId,
    user_id: UserId,
    action: &str,
) -> Result<PropertyDBResponse> {
    let (property, level) = require_view(conn, property_id, user_id).await?;
    if !level.is_owner() {
        return Err(Error::AccessDenied {
            required: AccessLevel::Owner,
            action: action.to_string(),
            resource: format!("property {property_id}"),
        });
    }
    Ok(property)
}
