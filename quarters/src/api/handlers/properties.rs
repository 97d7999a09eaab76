use crate::access::{require_edit, require_owner, require_view};
use crate::api::models::pagination::Pagination;
use crate::api::models::properties::{AccessResponse, PropertyCreate, PropertyResponse, PropertyUpdate};
use crate::api::models::users::CurrentUser;
use crate::db::handlers::{properties::PropertyFilter, Properties, Repository};
use crate::db::models::properties::{PropertyCreateDBRequest, PropertyUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::PropertyId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::Acquire;

#[utoipa::path(
    get,
    path = "/properties",
    tag = "properties",
    summary = "List properties",
    description = "Lists active properties the caller owns or collaborates on. Soft-deleted properties are excluded.",
    responses(
        (status = 200, description = "List of properties", body = Vec<PropertyResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("skip" = Option<i64>, Query, description = "Number of properties to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of properties to return"),
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_properties(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PropertyResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Properties::new(&mut pool_conn);

    let (skip, limit) = pagination.params();
    let properties = repo
        .list_for_user(&PropertyFilter::new(current_user.id, skip, limit))
        .await?;

    Ok(Json(properties.into_iter().map(PropertyResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/properties",
    tag = "properties",
    summary = "Create property",
    request_body = PropertyCreate,
    responses(
        (status = 201, description = "Property created successfully", body = PropertyResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_property(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(create): Json<PropertyCreate>,
) -> Result<(StatusCode, Json<PropertyResponse>)> {
    if create.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Property name must not be empty".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Properties::new(&mut pool_conn);
    let request = PropertyCreateDBRequest::new(current_user.id, create);

    let property = repo.create(&request).await?;
    Ok((StatusCode::CREATED, Json(PropertyResponse::from(property))))
}

#[utoipa::path(
    get,
    path = "/properties/deleted",
    tag = "properties",
    summary = "List deleted properties",
    description = "Lists soft-deleted properties owned by the caller, most recently deleted first.",
    responses(
        (status = 200, description = "List of soft-deleted properties", body = Vec<PropertyResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("skip" = Option<i64>, Query, description = "Number of properties to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of properties to return"),
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_deleted_properties(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PropertyResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Properties::new(&mut pool_conn);

    let (skip, limit) = pagination.params();
    let properties = repo
        .list_deleted_for_user(&PropertyFilter::new(current_user.id, skip, limit))
        .await?;

    Ok(Json(properties.into_iter().map(PropertyResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/properties/{property_id}",
    tag = "properties",
    summary = "Get property",
    responses(
        (status = 200, description = "Property details", body = PropertyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Property not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<Json<PropertyResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let (property, _) = require_view(&mut pool_conn, property_id, current_user.id).await?;
    Ok(Json(PropertyResponse::from(property)))
}

#[utoipa::path(
    patch,
    path = "/properties/{property_id}",
    tag = "properties",
    summary = "Update property",
    request_body = PropertyUpdate,
    responses(
        (status = 200, description = "Property updated successfully", body = PropertyResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_property(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
    Json(update): Json<PropertyUpdate>,
) -> Result<Json<PropertyResponse>> {
    if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(Error::Validation {
            message: "Property name must not be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let property;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let (existing, _) = require_edit(conn, property_id, current_user.id, "update").await?;
        if existing.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let mut repo = Properties::new(conn);
        property = repo.update(property_id, &PropertyUpdateDBRequest::from(update)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(PropertyResponse::from(property)))
}

#[utoipa::path(
    delete,
    path = "/properties/{property_id}",
    tag = "properties",
    summary = "Soft-delete property",
    description = "Marks the property deleted. It disappears from the default listing and can be restored.",
    responses(
        (status = 204, description = "Property soft-deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Property is already deleted"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_property(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_owner(conn, property_id, current_user.id, "delete").await?;

        let mut repo = Properties::new(conn);
        if !repo.soft_delete(property_id).await? {
            return Err(Error::Conflict {
                message: "Property is already deleted".to_string(),
            });
        }
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/properties/{property_id}/restore",
    tag = "properties",
    summary = "Restore property",
    description = "Reverses a soft delete. Restoring an active property is a conflict.",
    responses(
        (status = 200, description = "Property restored successfully", body = PropertyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Property is not deleted"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn restore_property(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<Json<PropertyResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let property;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_owner(conn, property_id, current_user.id, "restore").await?;

        let mut repo = Properties::new(conn);
        if !repo.restore(property_id).await? {
            return Err(Error::Conflict {
                message: "Property is not deleted".to_string(),
            });
        }
        property = repo.get_by_id(property_id).await?.ok_or(Error::NotFound {
            resource: "Property".to_string(),
            id: property_id.to_string(),
        })?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(PropertyResponse::from(property)))
}

#[utoipa::path(
    delete,
    path = "/properties/{property_id}/purge",
    tag = "properties",
    summary = "Purge property",
    description = "Permanently deletes a soft-deleted property. Units, collaborators, and nodes go with it.",
    responses(
        (status = 204, description = "Property purged successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Property must be soft-deleted first"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn purge_property(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_owner(conn, property_id, current_user.id, "purge").await?;

        let mut repo = Properties::new(conn);
        if !repo.purge(property_id).await? {
            return Err(Error::Conflict {
                message: "Property must be soft-deleted before it can be purged".to_string(),
            });
        }
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/properties/{property_id}/access",
    tag = "properties",
    summary = "Resolve access level",
    description = "Returns the caller's effective access level on the property (OWNER, EDITOR, or VIEWER). A caller with no access sees 404, the same as for a missing property.",
    responses(
        (status = 200, description = "Resolved access level", body = AccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Property not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_access(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<Json<AccessResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let (_, access_level) = require_view(&mut pool_conn, property_id, current_user.id).await?;
    Ok(Json(AccessResponse {
        property_id,
        user_id: current_user.id,
        access_level,
    }))
}
